use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::comment_actions::{CreateComment, DeleteComment, EditComment, StoreCommentView};
use crate::core::errors::{DatalogError, Result};
use crate::core::services::action_runner::{json_kind, perform};
use crate::core::traits::action::Action;
use crate::core::traits::unit_of_work::TransactionalStore;

type Handler<S> = fn(&mut S, Value) -> Result<Value>;

/// Actions callable by name with a JSON object of named arguments.
///
/// Names are kept in registration order. The registered name is exactly
/// the `operation_name` written to the change log.
pub struct ActionRegistry<S: TransactionalStore> {
    handlers: Vec<(&'static str, Handler<S>)>,
}

impl<S: TransactionalStore> ActionRegistry<S> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// A registry holding every comment action.
    pub fn with_comment_actions() -> Self {
        Self {
            handlers: vec![
                entry::<S, CreateComment>(),
                entry::<S, EditComment>(),
                entry::<S, DeleteComment>(),
                entry::<S, StoreCommentView>(),
            ],
        }
    }

    /// Register `A` under `A::NAME`. Fails if the name is already taken.
    pub fn try_register<A>(&mut self) -> Result<&mut Self>
    where
        A: Action + DeserializeOwned,
        A::Output: Serialize,
    {
        if self.contains(A::NAME) {
            return Err(DatalogError::DuplicateAction {
                name: A::NAME.to_string(),
            });
        }
        self.handlers.push(entry::<S, A>());
        Ok(self)
    }

    /// Whether an action is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.iter().any(|(n, _)| *n == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|(n, _)| *n).collect()
    }

    /// Run the action registered as `name` with `args`.
    ///
    /// `args` must be an object holding exactly the action's named
    /// arguments; anything else is rejected before a transaction starts.
    /// Returns the action's result as JSON (`null` for actions returning
    /// nothing).
    pub fn dispatch(&self, store: &mut S, name: &str, args: Value) -> Result<Value> {
        let handler = self
            .handlers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, h)| *h)
            .ok_or_else(|| DatalogError::UnknownAction {
                name: name.to_string(),
                available: self.names().join(", "),
            })?;
        handler(store, args)
    }
}

impl<S: TransactionalStore> Default for ActionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

fn entry<S, A>() -> (&'static str, Handler<S>)
where
    S: TransactionalStore,
    A: Action + DeserializeOwned,
    A::Output: Serialize,
{
    let handler: Handler<S> = invoke::<S, A>;
    (A::NAME, handler)
}

fn invoke<S, A>(store: &mut S, args: Value) -> Result<Value>
where
    S: TransactionalStore,
    A: Action + DeserializeOwned,
    A::Output: Serialize,
{
    let action = decode_arguments::<A>(args)?;
    let output = perform(store, &action)?;
    Ok(serde_json::to_value(output)?)
}

/// Decode a JSON object of named arguments into `A`'s argument record.
///
/// Arrays are refused explicitly: serde would otherwise accept them as
/// positional struct fields.
fn decode_arguments<A: Action + DeserializeOwned>(args: Value) -> Result<A> {
    if !args.is_object() {
        return Err(DatalogError::ArgumentShape {
            operation: A::NAME.to_string(),
            detail: format!("expected named arguments, got {}", json_kind(&args)),
        });
    }
    serde_json::from_value(args).map_err(|e| DatalogError::ArgumentShape {
        operation: A::NAME.to_string(),
        detail: e.to_string(),
    })
}
