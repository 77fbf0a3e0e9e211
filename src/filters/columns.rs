use std::collections::HashSet;

use super::field_filter::FieldFilter;
use crate::error::{Result, ZeekLogError};
use crate::models::{FieldType, Header, safe_field_name};

/// A header column that survives filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Position of the token in a data line
    pub index: usize,
    /// Effective name: the declared name, safe-rewritten when enabled
    pub name: String,
    pub field_type: FieldType,
}

/// Select the active columns of `header`, in declaration order
///
/// The filter is matched against the effective name, so with `safe_headers` the caller
/// filters on `service_proto` rather than `service,proto`.
///
/// # Errors
///
/// Returns [`ZeekLogError::MalformedHeader`] if safe renaming maps two selected fields to
/// the same name, e.g. `a,b` and `a_b`.
pub fn select_columns(
    header: &Header,
    filter: &FieldFilter,
    safe_headers: bool,
) -> Result<Vec<Column>> {
    let mut columns = Vec::with_capacity(header.len());
    let mut seen = HashSet::with_capacity(header.len());

    for (index, (declared, field_type)) in header.fields().iter().zip(header.types()).enumerate() {
        let name = if safe_headers {
            safe_field_name(declared, header.set_separator())
        } else {
            declared.clone()
        };
        if !filter.allows(&name) {
            continue;
        }
        if !seen.insert(name.clone()) {
            return Err(ZeekLogError::MalformedHeader(format!(
                "safe header name '{}' of field '{}' collides with another field",
                name, declared
            )));
        }
        columns.push(Column { index, name, field_type: field_type.clone() });
    }

    Ok(columns)
}
