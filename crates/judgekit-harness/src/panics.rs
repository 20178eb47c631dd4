//! Panic capture and expected-panic assertions.

use std::any::Any;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};

/// Payload carried by an unwinding panic.
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// Run `f`, turning a panic into `Err(payload)`.
pub fn catch_panic<F, O>(f: F) -> Result<O, PanicPayload>
where
    F: FnOnce() -> O,
{
    panic::catch_unwind(AssertUnwindSafe(f))
}

/// The message of a `panic!`-style payload, if it carries one.
pub fn panic_message(payload: &PanicPayload) -> Option<&str> {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Some(s)
    } else {
        payload.downcast_ref::<String>().map(String::as_str)
    }
}

/// Fail unless `f` panics with exactly `expected` as its message.
#[track_caller]
pub fn expect_panic_message<F, O>(f: F, expected: &str)
where
    F: FnOnce() -> O,
{
    match catch_panic(f) {
        Ok(_) => panic!("expected a panic with message {expected:?}, but none occurred"),
        Err(payload) => {
            let actual = panic_message(&payload);
            assert_eq!(
                actual,
                Some(expected),
                "unexpected panic message"
            );
        }
    }
}

/// Fail unless `f` panics with a payload of type `P` equal to `expected`.
///
/// Use with [`std::panic::panic_any`] for solutions that signal errors
/// with typed values.
#[track_caller]
pub fn expect_panic_payload<P, F, O>(f: F, expected: &P)
where
    P: Any + PartialEq + Debug,
    F: FnOnce() -> O,
{
    match catch_panic(f) {
        Ok(_) => panic!("expected a panic with payload {expected:?}, but none occurred"),
        Err(payload) => match payload.downcast_ref::<P>() {
            Some(actual) => assert_eq!(actual, expected, "unexpected panic payload"),
            None => panic!(
                "expected a panic payload of type {}, got {:?}",
                std::any::type_name::<P>(),
                panic_message(&payload)
            ),
        },
    }
}
