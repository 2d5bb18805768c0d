//! Named failpoints for debug builds.
//!
//! A failpoint is declared inline with [`fail_err!`] and registered at link
//! time, so [`list`] knows about every failpoint in the binary before any of
//! them has been reached. Release builds compile the macros away.

use std::collections::BTreeMap;
use std::sync::{LazyLock, RwLock};

#[derive(Debug)]
pub struct Failpoint {
    pub name: &'static str,
}

inventory::collect!(Failpoint);

static ARMED: LazyLock<RwLock<BTreeMap<String, bool>>> = LazyLock::new(|| {
    RwLock::new(if cfg!(debug_assertions) {
        inventory::iter::<Failpoint>()
            .map(|point| (point.name.to_string(), false))
            .collect()
    } else {
        BTreeMap::new()
    })
});

/// Returns `Err($value)` from the enclosing function when the failpoint
/// `<crate name>::$name` is armed.
#[macro_export]
macro_rules! fail_err {
    ($name:literal, $value:expr) => {
        #[cfg(debug_assertions)]
        {
            const NAME: &'static str = concat!(env!("CARGO_PKG_NAME"), "::", $name);

            $crate::private::inventory::submit! {
                $crate::Failpoint { name: NAME }
            }

            if $crate::private::is_armed(NAME) {
                $crate::private::tracing::warn!(failpoint = NAME, "Failpoint triggered");
                Err($value)?;
            }
        }
    };
}

#[doc(hidden)]
pub mod private {
    use super::*;

    pub use inventory;
    pub use tracing;

    pub fn is_armed(name: &str) -> bool {
        ARMED
            .read()
            .map(|points| points.get(name).copied().unwrap_or_default())
            .unwrap_or_default()
    }
}

/// Every known failpoint and whether it is armed.
pub fn list() -> BTreeMap<String, bool> {
    ARMED.read().map(|points| points.clone()).unwrap_or_default()
}

pub fn set_fail(name: impl Into<String>, armed: bool) {
    if let Ok(mut points) = ARMED.write() {
        points.insert(name.into(), armed);
    }
}
