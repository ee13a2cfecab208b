//! Merge policy for `getAllAndMerge`
//!
//! Values are classified by shape:
//! - object: a JSON object
//! - sequence: a JSON array
//! - anything else is a scalar (null included)
//!
//! Combination is a strict left fold, so target order decides which object
//! keys win and in which order sequences are concatenated.

use reflector_store::Value;

/// Object-shaped: non-null and not a sequence
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

/// Combine the defined values found across targets
pub fn merge_values(values: Vec<Value>) -> Value {
    let mut values = values.into_iter();
    let Some(first) = values.next() else {
        return Value::Array(Vec::new());
    };
    let Some(second) = values.next() else {
        return if is_object(&first) {
            first
        } else {
            Value::Array(vec![first])
        };
    };
    let acc = combine(first, second);
    values.fold(acc, combine)
}

/// One fold step
///
/// A sequence accumulator absorbs the next value (spreading sequences), two
/// objects union with right-hand keys winning, any other pair becomes
/// `[acc, next]`.
fn combine(acc: Value, next: Value) -> Value {
    match (acc, next) {
        (Value::Array(mut items), Value::Array(more)) => {
            items.extend(more);
            Value::Array(items)
        }
        (Value::Array(mut items), next) => {
            items.push(next);
            Value::Array(items)
        }
        (Value::Object(mut fields), Value::Object(more)) => {
            fields.extend(more);
            Value::Object(fields)
        }
        (acc, next) => Value::Array(vec![acc, next]),
    }
}
