use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::OrganizationsError;

/// Completion callback for one asynchronous operation.
///
/// At most one of the two methods is called, once, on the thread that ran
/// the operation, before the matching handle completes. `on_error` only sees
/// errors the operation returned: a panicking operation reaches neither
/// method and its handle reports [`TaskError::Panicked`](crate::TaskError::Panicked).
/// Cancelled, rejected and abandoned tasks reach neither method either.
pub trait AsyncHandler<Req, Res>: Send + Sync + 'static {
    fn on_success(&self, request: &Req, result: &Res);

    fn on_error(&self, error: &OrganizationsError);
}

impl<Req, Res, H> AsyncHandler<Req, Res> for Arc<H>
where
    H: AsyncHandler<Req, Res> + ?Sized,
{
    fn on_success(&self, request: &Req, result: &Res) {
        (**self).on_success(request, result)
    }

    fn on_error(&self, error: &OrganizationsError) {
        (**self).on_error(error)
    }
}

/// Handler assembled from a pair of closures.
pub struct FnHandler<S, E, Req, Res>
where
    S: Fn(&Req, &Res) + Send + Sync + 'static,
    E: Fn(&OrganizationsError) + Send + Sync + 'static,
{
    on_success: S,
    on_error: E,
    _marker: PhantomData<fn(&Req, &Res)>,
}

impl<S, E, Req, Res> FnHandler<S, E, Req, Res>
where
    S: Fn(&Req, &Res) + Send + Sync + 'static,
    E: Fn(&OrganizationsError) + Send + Sync + 'static,
{
    pub fn new(on_success: S, on_error: E) -> Self {
        Self {
            on_success,
            on_error,
            _marker: PhantomData,
        }
    }
}

impl<S, E, Req, Res> AsyncHandler<Req, Res> for FnHandler<S, E, Req, Res>
where
    S: Fn(&Req, &Res) + Send + Sync + 'static,
    E: Fn(&OrganizationsError) + Send + Sync + 'static,
    Req: 'static,
    Res: 'static,
{
    fn on_success(&self, request: &Req, result: &Res) {
        (self.on_success)(request, result)
    }

    fn on_error(&self, error: &OrganizationsError) {
        (self.on_error)(error)
    }
}
