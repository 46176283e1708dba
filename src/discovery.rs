//! API discovery: locating the host runtime object.
//!
//! The runtime object lives on some ancestor of the content's window, or on
//! the window that opened the content's top-level window. Each lookup walks up
//! the parent chain from one starting context, bounded by
//! `find_attempt_limit` hops so a circular or malformed hierarchy can't trap
//! it. The first successful handle is memoized for the rest of the session.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::error::{Result, ScormError};
use crate::host::{BrowsingContext, ContextRef, RuntimeHandle};
use crate::session::SessionContext;
use crate::types::ScormVersion;

/// Discovery component, borrowing the session for one operation.
pub struct Discovery<'s> {
    session: &'s mut SessionContext,
}

impl<'s> Discovery<'s> {
    pub fn new(session: &'s mut SessionContext) -> Self {
        Self { session }
    }

    /// Whether a handle has been found this session
    pub fn is_found(&self) -> bool {
        self.session.api.found
    }

    /// Hops taken by the most recent walk
    pub fn last_attempts(&self) -> u32 {
        self.session.api.last_attempts
    }

    /// Walk up from `start` and return the host object there, if any.
    ///
    /// Resolves the session's version as a side effect when none was pinned.
    pub fn find(&mut self, start: &ContextRef) -> Option<RuntimeHandle> {
        let limit = self.session.config.find_attempt_limit;
        let mut current = Rc::clone(start);
        let mut attempts = 0;

        while !exposes_api(current.as_ref()) && attempts < limit {
            match current.parent() {
                Some(parent) => {
                    current = parent;
                    attempts += 1;
                }
                None => break,
            }
        }
        self.session.api.last_attempts = attempts;

        let handle = self.assign(current.as_ref());
        if handle.is_none() {
            warn!(attempts, limit, "Error finding API");
        }
        handle
    }

    /// Try the four lookup paths in order without consulting the cache:
    /// this context, its parent, the top window's opener, that opener's document.
    ///
    /// A success replaces the memoized handle.
    pub fn locate(&mut self) -> Option<RuntimeHandle> {
        let root = Rc::clone(&self.session.api.root);

        let mut handle = self.find(&root);
        if handle.is_none() {
            if let Some(parent) = root.parent() {
                handle = self.find(&parent);
            }
        }

        let opener = root.top_opener();
        if handle.is_none() {
            if let Some(opener) = &opener {
                debug!("Looking for API on opener window");
                handle = self.find(opener);
            }
        }
        if handle.is_none() {
            if let Some(document) = opener.as_ref().and_then(|o| o.document()) {
                debug!("Looking for API on opener document");
                handle = self.find(&document);
            }
        }

        if handle.is_some() {
            self.session.api.handle = handle.clone();
            self.session.api.found = true;
        } else {
            warn!("API.get failed: Can't find the API!");
        }
        handle
    }

    /// Memoized handle. Walks only until the first success.
    pub fn handle(&mut self) -> Option<RuntimeHandle> {
        if self.session.api.handle.is_none() && !self.session.api.found {
            self.locate();
        }
        self.session.api.handle.clone()
    }

    /// Memoized handle, or why there isn't one.
    pub fn require(&mut self) -> Result<RuntimeHandle> {
        self.handle().ok_or(ScormError::DiscoveryFailure {
            attempts: self.session.api.last_attempts,
            limit: self.session.config.find_attempt_limit,
        })
    }

    fn assign(&mut self, context: &dyn BrowsingContext) -> Option<RuntimeHandle> {
        let handle = match self.session.version {
            Some(version) => Self::by_version(context, version),
            None => self.without_version(context),
        };
        if let Some(handle) = &handle {
            info!(version = %handle.version(), "API found");
        }
        handle
    }

    /// A pinned version must find its own shape; the other one is never used instead.
    fn by_version(context: &dyn BrowsingContext, version: ScormVersion) -> Option<RuntimeHandle> {
        match context.runtime_api(version) {
            Some(api) => Some(RuntimeHandle::new(version, api)),
            None => {
                warn!(
                    "SCORM version {} was specified by user, but {} cannot be found.",
                    version,
                    version.api_object_name()
                );
                None
            }
        }
    }

    /// Prefer the 2004 shape, fall back to 1.2, and record which one was taken.
    fn without_version(&mut self, context: &dyn BrowsingContext) -> Option<RuntimeHandle> {
        let version = [ScormVersion::Scorm2004, ScormVersion::Scorm12]
            .into_iter()
            .find(|v| context.runtime_api(*v).is_some())?;
        let api = context.runtime_api(version)?;
        self.session.version = Some(version);
        Some(RuntimeHandle::new(version, api))
    }
}

fn exposes_api(context: &dyn BrowsingContext) -> bool {
    context.runtime_api(ScormVersion::Scorm2004).is_some()
        || context.runtime_api(ScormVersion::Scorm12).is_some()
}
