use serde::Serialize;

use crate::core::errors::Result;
use crate::core::traits::unit_of_work::UnitOfWork;

/// A named, logged, transactional write operation.
///
/// The implementing struct is the argument record: its fields are the
/// action's named arguments, and its `Serialize` output is what gets stored
/// in the change log. `apply` is the plain write body; callers never invoke
/// it directly but go through `action_runner::perform` or `perform_in`,
/// which pair it with a log record.
pub trait Action: Serialize {
    /// Registered name, persisted as `LogRecord::operation_name`.
    const NAME: &'static str;

    /// What the action returns on success.
    type Output;

    /// Perform the writes.
    fn apply(&self, uow: &dyn UnitOfWork) -> Result<Self::Output>;
}
