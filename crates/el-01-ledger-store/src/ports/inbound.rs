//! # Inbound Ports (Driving Ports)
//!
//! How callers reach a component's named operations.
//!
//! Each component publishes a static operation table mapping a remote-call
//! name to a handler and an [`OperationMode`]. The gateway uses the mode to
//! decide between evaluation and submission; handlers never see it.

use crate::transaction::TxContext;
use shared_types::{ComponentId, ContractError, OperationMode};

/// Handler for one named operation. Arguments are positional strings.
pub type Handler<C> =
    fn(&C, &mut TxContext<'_>, &[String]) -> Result<serde_json::Value, ContractError>;

/// One row of an operation table.
pub struct Operation<C: 'static> {
    pub name: &'static str,
    pub mode: OperationMode,
    pub handler: Handler<C>,
}

/// A ledger component with a static operation table.
pub trait Contract: Send + Sync + Sized + 'static {
    const COMPONENT: ComponentId;

    fn operations() -> &'static [Operation<Self>];

    fn operation(name: &str) -> Option<&'static Operation<Self>> {
        Self::operations().iter().find(|op| op.name == name)
    }
}

/// Object-safe view of a [`Contract`] for routing by component id.
pub trait Dispatch: Send + Sync {
    fn component(&self) -> ComponentId;

    fn mode_of(&self, function: &str) -> Option<OperationMode>;

    fn operation_names(&self) -> Vec<&'static str>;

    fn dispatch(
        &self,
        function: &str,
        ctx: &mut TxContext<'_>,
        args: &[String],
    ) -> Result<serde_json::Value, ContractError>;
}

impl<C: Contract> Dispatch for C {
    fn component(&self) -> ComponentId {
        C::COMPONENT
    }

    fn mode_of(&self, function: &str) -> Option<OperationMode> {
        C::operation(function).map(|op| op.mode)
    }

    fn operation_names(&self) -> Vec<&'static str> {
        C::operations().iter().map(|op| op.name).collect()
    }

    fn dispatch(
        &self,
        function: &str,
        ctx: &mut TxContext<'_>,
        args: &[String],
    ) -> Result<serde_json::Value, ContractError> {
        let op = C::operation(function).ok_or_else(|| ContractError::UnknownOperation {
            component: C::COMPONENT.to_string(),
            function: function.to_string(),
        })?;
        (op.handler)(self, ctx, args)
    }
}

/// Serialize a handler result.
pub fn to_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ContractError> {
    serde_json::to_value(value).map_err(|e| ContractError::Store(e.into()))
}
