use either::Either;
use mizar_common::prelude::*;
use mizar_common::{InvocationContext, LockSpec};

/// Derives the canonical lock identity for one invocation from its declared
/// spec and live arguments.
pub struct LockKeyUtils;

impl LockKeyUtils {
    /// Resolution is a pure function of spec and context: same inputs, same
    /// identity, so logically identical calls contend on the same lock. It
    /// never fails; a spec that cannot contribute any identity resolves to
    /// the empty string, which callers treat as "skip locking".
    ///
    /// An explicit lock key always wins. Otherwise the identity is
    /// `DeclaringType.operation` followed by the resolved attribute values in
    /// declaration order. Attribute paths whose root names no parameter are
    /// skipped silently, so a spec whose paths all miss yields the bare
    /// `DeclaringType.operation` identity: contention is then scoped to any
    /// call of that operation. Coarser than per-subject locking, but that is
    /// the defined behavior.
    pub fn resolve_lock_key(spec: &LockSpec, ctx: &InvocationContext) -> InlineStr {
        if !spec.lock_key.is_empty() {
            return spec.lock_key.clone();
        }
        // nothing to derive an identity from
        if spec.attribute_names.is_empty() && ctx.parameter_values.is_empty() {
            return InlineStr::new();
        }

        let parameter_map = ctx.parameter_map();
        let mut document_context = Either::Left(parameter_map.clone());
        let mut lock_params = InlineStr::new();
        for attribute_name in &spec.attribute_names {
            let (root, rest) = match attribute_name.split_once('.') {
                Some((root, rest)) => (root, Some(rest)),
                None => (attribute_name.as_str(), None),
            };
            let parameter_value = match parameter_map.get(root) {
                Some(parameter_value) => parameter_value,
                None => continue,
            };
            let resolved = match rest {
                None => parameter_value.to_string(),
                Some(rest) => match parameter_value {
                    // collection roots get index-aware lookup instead of
                    // plain property access
                    Object::List(list) => Self::resolve_in_list(list, rest),
                    _ => Object::read(&mut document_context, attribute_name),
                },
            };
            if resolved.is_empty() {
                continue;
            }
            lock_params.push_str(".");
            lock_params.push_str(&resolved);
        }

        let mut lock_key = InlineStr::new();
        lock_key.push_str(&ctx.declaring_type_name);
        lock_key.push_str(".");
        lock_key.push_str(&ctx.operation_name);
        lock_key.push_str(&lock_params);
        lock_key
    }

    /// Walks the remaining path segments over a list root: numeric segments
    /// index into lists, other segments look up map keys.
    fn resolve_in_list(list: &Vec<Object>, rest: &str) -> InlineStr {
        let mut cursor = Object::List(list.clone());
        for segment in rest.split('.') {
            let next = match &cursor {
                Object::List(list) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| list.get(index))
                    .cloned(),
                Object::Map(map) => map.get(segment).cloned(),
                _ => None,
            };
            match next {
                Some(next) => cursor = next,
                None => return InlineStr::new(),
            }
        }
        cursor.to_string()
    }
}
