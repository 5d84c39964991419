use serde_json::Value;

use crate::core::errors::{DatalogError, Result};
use crate::core::models::log_record::LogRecord;
use crate::core::traits::action::Action;
use crate::core::traits::unit_of_work::{TransactionalStore, UnitOfWork};

/// Run `action` in a new transaction on `store`, paired with a log record.
///
/// The arguments are encoded first, so a badly shaped argument record is
/// rejected before anything is written. Then, inside one transaction, the log
/// record is inserted and the action body runs. The transaction commits only
/// if the body succeeds; on any failure it is dropped, which rolls back both
/// the log record and whatever the body wrote.
pub fn perform<S, A>(store: &mut S, action: &A) -> Result<A::Output>
where
    S: TransactionalStore,
    A: Action,
{
    let data = encode_arguments(action)?;
    tracing::debug!(operation = A::NAME, "starting action");

    let tx = store.begin()?;
    let (record, output) = match run_logged(&tx, action, data) {
        Ok(done) => done,
        Err(e) => {
            tracing::warn!(operation = A::NAME, error = %e, "action failed, rolling back");
            return Err(e);
        }
    };
    tx.commit()?;

    tracing::info!(
        operation = A::NAME,
        operation_uuid = %record.operation_uuid,
        "action committed"
    );
    Ok(output)
}

/// Run `action` inside an existing unit of work.
///
/// The action joins the caller's transaction instead of opening its own, so
/// nothing it writes is committed before the outermost scope commits. Its
/// writes are wrapped in a savepoint: if it fails, its own log record and
/// writes are undone even when the caller chooses to carry on.
///
/// Nested calls are not linked to the enclosing action: each one writes an
/// independent log record with no parent.
pub fn perform_in<A: Action>(uow: &dyn UnitOfWork, action: &A) -> Result<A::Output> {
    let data = encode_arguments(action)?;
    tracing::debug!(operation = A::NAME, "starting nested action");

    let savepoint = uow.savepoint()?;
    match run_logged(uow, action, data) {
        Ok((_, output)) => {
            uow.release(savepoint)?;
            Ok(output)
        }
        Err(e) => {
            tracing::warn!(operation = A::NAME, error = %e, "nested action failed, rolling back");
            if let Err(rollback_err) = uow.rollback_to(savepoint) {
                tracing::error!(error = %rollback_err, "savepoint rollback failed");
            }
            Err(e)
        }
    }
}

/// Insert the log record for `action`, then run its body.
fn run_logged<A: Action>(
    uow: &dyn UnitOfWork,
    action: &A,
    data: String,
) -> Result<(LogRecord, A::Output)> {
    let record = LogRecord::new(A::NAME, data, uow.source());
    uow.insert_log_record(&record)?;
    let output = action.apply(uow)?;
    Ok((record, output))
}

/// Encode an argument record as a JSON object.
///
/// Only flat records of named arguments are accepted, so every log entry has
/// the same self-describing shape. Keys come out sorted.
pub fn encode_arguments<A: Action>(action: &A) -> Result<String> {
    match serde_json::to_value(action)? {
        value @ Value::Object(_) => Ok(serde_json::to_string(&value)?),
        other => Err(DatalogError::ArgumentShape {
            operation: A::NAME.to_string(),
            detail: format!("expected named arguments, got {}", json_kind(&other)),
        }),
    }
}

/// Human-readable name of a JSON value's type.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "positional arguments",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::sqlite_store::SqliteStore;
    use crate::core::models::comment::Comment;
    use crate::core::traits::change_log::ChangeLog;
    use serde::Serialize;
    use serde_json::json;
    use uuid::Uuid;

    /// Writes a comment, then fails.
    #[derive(Serialize)]
    struct WriteThenFail {
        target_uuid: Uuid,
    }

    impl Action for WriteThenFail {
        const NAME: &'static str = "write_then_fail";
        type Output = ();

        fn apply(&self, uow: &dyn UnitOfWork) -> Result<()> {
            uow.insert_comment(&Comment::new(self.target_uuid, Uuid::new_v4(), "doomed"))?;
            Err(DatalogError::Encoding {
                detail: "boom".into(),
            })
        }
    }

    #[derive(Serialize)]
    struct Positional(Uuid, String);

    impl Action for Positional {
        const NAME: &'static str = "positional";
        type Output = ();

        fn apply(&self, _uow: &dyn UnitOfWork) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Serialize)]
    struct Note {
        target_uuid: Uuid,
        text: String,
        tags: Vec<String>,
    }

    impl Action for Note {
        const NAME: &'static str = "note";
        type Output = Comment;

        fn apply(&self, uow: &dyn UnitOfWork) -> Result<Comment> {
            let comment = Comment::new(self.target_uuid, Uuid::nil(), self.text.clone());
            uow.insert_comment(&comment)?;
            Ok(comment)
        }
    }

    /// Calls `Note` from inside its own body.
    #[derive(Serialize)]
    struct NoteTwice {
        target_uuid: Uuid,
    }

    impl Action for NoteTwice {
        const NAME: &'static str = "note_twice";
        type Output = ();

        fn apply(&self, uow: &dyn UnitOfWork) -> Result<()> {
            perform_in(
                uow,
                &Note {
                    target_uuid: self.target_uuid,
                    text: "inner".into(),
                    tags: vec![],
                },
            )?;
            Ok(())
        }
    }

    /// Swallows a failing nested action and carries on.
    #[derive(Serialize)]
    struct TolerateFailure {
        target_uuid: Uuid,
    }

    impl Action for TolerateFailure {
        const NAME: &'static str = "tolerate_failure";
        type Output = ();

        fn apply(&self, uow: &dyn UnitOfWork) -> Result<()> {
            let nested = perform_in(
                uow,
                &WriteThenFail {
                    target_uuid: self.target_uuid,
                },
            );
            assert!(nested.is_err());
            Ok(())
        }
    }

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory(Default::default()).unwrap()
    }

    #[test]
    fn successful_action_writes_one_log_record() {
        let mut store = store();
        let target = Uuid::new_v4();

        let comment = perform(
            &mut store,
            &Note {
                target_uuid: target,
                text: "hello".into(),
                tags: vec!["a".into(), "b".into()],
            },
        )
        .unwrap();

        let records = store.records(None, None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation_name, "note");
        assert_eq!(
            records[0].arguments().unwrap(),
            json!({ "target_uuid": target.to_string(), "text": "hello", "tags": ["a", "b"] })
        );
        assert!(store.get_comment(&comment.comment_uuid).unwrap().is_some());
    }

    #[test]
    fn failed_action_leaves_no_trace() {
        let mut store = store();

        let result = perform(
            &mut store,
            &WriteThenFail {
                target_uuid: Uuid::new_v4(),
            },
        );

        assert!(result.is_err());
        assert_eq!(store.record_count().unwrap(), 0);
        assert_eq!(store.count_comments().unwrap(), 0);
    }

    #[test]
    fn positional_arguments_are_rejected_before_writing() {
        let mut store = store();

        let result = perform(&mut store, &Positional(Uuid::new_v4(), "x".into()));

        assert!(matches!(
            result,
            Err(DatalogError::ArgumentShape { ref operation, .. }) if operation == "positional"
        ));
        assert_eq!(store.record_count().unwrap(), 0);
    }

    #[test]
    fn nested_action_is_logged_independently() {
        let mut store = store();

        perform(
            &mut store,
            &NoteTwice {
                target_uuid: Uuid::new_v4(),
            },
        )
        .unwrap();

        let records = store.records(None, None).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.operation_name.as_str()).collect();
        assert_eq!(names, ["note_twice", "note"]);
        assert!(records.iter().all(|r| r.parent_operation_uuid.is_none()));
    }

    #[test]
    fn failed_nested_action_is_undone_even_if_caller_continues() {
        let mut store = store();

        perform(
            &mut store,
            &TolerateFailure {
                target_uuid: Uuid::new_v4(),
            },
        )
        .unwrap();

        let records = store.records(None, None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].operation_name, "tolerate_failure");
        assert_eq!(store.count_comments().unwrap(), 0);
    }

    #[test]
    fn nested_writes_roll_back_with_outer_transaction() {
        let mut store = store();

        {
            let tx = store.begin().unwrap();
            perform_in(
                &tx,
                &Note {
                    target_uuid: Uuid::new_v4(),
                    text: "never committed".into(),
                    tags: vec![],
                },
            )
            .unwrap();
            // dropped without commit
        }

        assert_eq!(store.record_count().unwrap(), 0);
        assert_eq!(store.count_comments().unwrap(), 0);
    }

    #[test]
    fn encode_arguments_sorts_keys() {
        let encoded = encode_arguments(&Note {
            target_uuid: Uuid::nil(),
            text: "t".into(),
            tags: vec![],
        })
        .unwrap();

        assert_eq!(
            encoded,
            r#"{"tags":[],"target_uuid":"00000000-0000-0000-0000-000000000000","text":"t"}"#
        );
    }
}
