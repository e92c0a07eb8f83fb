//! Integer type - sign + unsigned magnitude
//!
//! Design: Fixed-width `u64` magnitude with a separate sign. Zero may carry
//! either sign and all zeros compare equal. Overflow is a fatal error, never
//! a silent wrap.

use crate::error::{fatal, Violation};
use crate::heap::{Heap, TypeInfo};
use crate::objects::{IntData, ObjRef, Payload, Sign};

static INT_TYPE: TypeInfo = TypeInfo::simple("Int");

/// Create a new integer. Returns a new reference.
pub fn new(heap: &mut Heap, magnitude: u64, sign: Sign) -> ObjRef {
    INT_TYPE.instantiate(heap, Payload::Int(IntData { sign, magnitude }))
}

/// Create from a signed machine integer
pub fn from_i64(heap: &mut Heap, value: i64) -> ObjRef {
    let sign = if value < 0 { Sign::Negative } else { Sign::Positive };
    new(heap, value.unsigned_abs(), sign)
}

/// Return `a + b`. Returns a new reference.
pub fn add(heap: &mut Heap, a: ObjRef, b: ObjRef) -> ObjRef {
    let sum = add_data(data(heap, a), data(heap, b));
    INT_TYPE.instantiate(heap, Payload::Int(sum))
}

/// Return `a == b`
pub fn equals(heap: &Heap, a: ObjRef, b: ObjRef) -> bool {
    eq_data(data(heap, a), data(heap, b))
}

pub fn sign(heap: &Heap, obj: ObjRef) -> Sign {
    data(heap, obj).sign
}

pub fn magnitude(heap: &Heap, obj: ObjRef) -> u64 {
    data(heap, obj).magnitude
}

/// Widen to `i128`, which holds every representable value
pub fn to_i128(heap: &Heap, obj: ObjRef) -> i128 {
    let IntData { sign, magnitude } = data(heap, obj);
    match sign {
        Sign::Positive => i128::from(magnitude),
        Sign::Negative => -i128::from(magnitude),
    }
}

#[inline]
fn data(heap: &Heap, obj: ObjRef) -> IntData {
    *heap.payload(obj).expect_int()
}

fn add_data(a: IntData, b: IntData) -> IntData {
    if a.sign == b.sign {
        let magnitude = a.magnitude.checked_add(b.magnitude).unwrap_or_else(|| {
            fatal(Violation::MagnitudeOverflow { lhs: a.magnitude, rhs: b.magnitude })
        });
        return IntData { sign: a.sign, magnitude };
    }

    // the larger magnitude decides the sign
    if a.magnitude > b.magnitude {
        IntData { sign: a.sign, magnitude: a.magnitude - b.magnitude }
    } else {
        IntData { sign: b.sign, magnitude: b.magnitude - a.magnitude }
    }
}

fn eq_data(a: IntData, b: IntData) -> bool {
    if a.magnitude == 0 && b.magnitude == 0 {
        return true;
    }
    a == b
}
