//! Session helpers so handlers only deal with employee identifiers.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{EmployeeId, Error};

pub(crate) const EMPLOYEE_ID_KEY: &str = "employee_id";

/// Newtype over the Actix session exposing the login state.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated employee, rotating the session identifier.
    pub fn persist_employee(&self, employee_id: &EmployeeId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(EMPLOYEE_ID_KEY, employee_id.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The logged-in employee, if any. Tampered values count as logged out.
    pub fn employee_id(&self) -> Result<Option<EmployeeId>, Error> {
        let raw = self
            .0
            .get::<String>(EMPLOYEE_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match EmployeeId::new(raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid employee id in session cookie");
                None
            }
        }))
    }

    /// Require a logged-in employee or fail with `401 Unauthorized`.
    pub fn require_employee_id(&self) -> Result<EmployeeId, Error> {
        self.employee_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop every session entry and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
