use crate::prelude::*;

/// Snapshot of one guarded call: who declares it and the live arguments the
/// lock identity may be derived from. Built fresh per call and discarded
/// afterwards.
///
/// Parameter names must be supplied by the declaration site; they are not
/// recoverable from a compiled callable.
#[derive(Clone, Debug)]
pub struct InvocationContext {
    /// Name of the type declaring the guarded operation.
    pub declaring_type_name: InlineStr,
    /// Name of the guarded operation itself.
    pub operation_name: InlineStr,
    /// Parameter names, positionally matching `parameter_values`.
    pub parameter_names: Vec<InlineStr>,
    pub parameter_values: Vec<Object>,
}

impl InvocationContext {
    pub fn new(
        declaring_type_name: impl Into<InlineStr>,
        operation_name: impl Into<InlineStr>,
    ) -> Self {
        Self {
            declaring_type_name: declaring_type_name.into(),
            operation_name: operation_name.into(),
            parameter_names: Vec::default(),
            parameter_values: Vec::default(),
        }
    }

    pub fn add_parameter(&mut self, name: impl Into<InlineStr>, value: Object) {
        self.parameter_names.push(name.into());
        self.parameter_values.push(value);
    }

    /// Positional map of parameter name to value. Extra names beyond the
    /// value list (or vice versa) are dropped by the pairing.
    pub fn parameter_map(&self) -> HashMap<InlineStr, Object> {
        let mut parameter_map = HashMap::with_capacity(self.parameter_names.len());
        for (name, value) in self.parameter_names.iter().zip(self.parameter_values.iter()) {
            parameter_map.insert(name.clone(), value.clone());
        }
        parameter_map
    }
}
