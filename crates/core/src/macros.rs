// SPDX-License-Identifier: MIT

//! Declarative macros for reducing boilerplate.
//!
//! - [`data_type!`] — implements [`crate::object::DataType`] for a struct/enum

/// Implement [`crate::object::DataType`] for a type, giving it a stable
/// class-name key independent of Rust's `TypeId`/module identity.
///
/// This is the Resolver's substitute for runtime type identification (see
/// spec §9): factories are looked up and matched by this string, never by
/// `TypeId`, so the lookup behaves the same across crate/plugin boundaries.
///
/// ```ignore
/// pub struct Hit { ... }
/// nucleus_core::data_type!(Hit, "Hit");
/// ```
#[macro_export]
macro_rules! data_type {
    ($ty:ty, $class_name:expr) => {
        impl $crate::object::DataType for $ty {
            fn type_key() -> $crate::id::TypeKey {
                $crate::id::TypeKey($class_name)
            }
        }
    };
}
