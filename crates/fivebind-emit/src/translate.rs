//! Argument marshaling between the Rust wrapper types and the C stdlib ABI.
//!
//! Every supported [`ArgKind`] maps to a parameter declaration on the
//! wrapper and an expression that rebuilds the exact value the native call
//! expects. This table is the single source of truth for both.

use fivebind_core::descriptor::{ArgKind, Argument};

use crate::convention::CallingConvention;
use crate::error::{EmitError, Result};
use crate::naming::escape_keyword;

/// Wrapper type for tree handles.
pub const HANDLE_TYPE: &str = "Tree";
/// Wrapper type for scalar expressions.
pub const FLOAT_TYPE: &str = "TreeFloat";
/// Wrapper type for 2D expression vectors.
pub const VEC2_TYPE: &str = "TreeVec2";
/// Wrapper type for 3D expression vectors.
pub const VEC3_TYPE: &str = "TreeVec3";

/// One translated argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    /// Parameter declaration, or `None` when the argument is the receiver.
    pub param: Option<String>,
    /// Expression producing the native value.
    pub call: String,
}

/// Classify an argument, failing on anything outside the supported set.
pub fn arg_kind(arg: &Argument, function: &str) -> Result<ArgKind> {
    arg.kind().ok_or_else(|| EmitError::UnsupportedType {
        function: function.to_string(),
        argument: arg.name.clone(),
        c_type: arg.declared_type.clone(),
    })
}

/// Translate one argument of `function` under `convention`.
pub fn translate(
    arg: &Argument,
    convention: CallingConvention,
    function: &str,
) -> Result<Translated> {
    let kind = arg_kind(arg, function)?;
    let name = escape_keyword(&arg.name);

    let translated = match kind {
        ArgKind::Handle if convention.uses_receiver() && arg.index == 0 => Translated {
            param: None,
            call: "self.0".to_string(),
        },
        ArgKind::Handle => Translated {
            param: Some(format!("{name}: {HANDLE_TYPE}")),
            call: format!("{name}.0"),
        },
        ArgKind::Float => Translated {
            param: Some(format!("{name}: {FLOAT_TYPE}")),
            call: format!("{name}.0"),
        },
        ArgKind::Vec2 => Translated {
            param: Some(format!("{name}: {VEC2_TYPE}")),
            call: format!("sys::tvec2 {{ x: {name}.x.0, y: {name}.y.0 }}"),
        },
        ArgKind::Vec3 => Translated {
            param: Some(format!("{name}: {VEC3_TYPE}")),
            call: format!("sys::tvec3 {{ x: {name}.x.0, y: {name}.y.0, z: {name}.z.0 }}"),
        },
        ArgKind::UInt => Translated {
            param: Some(format!("{name}: u32")),
            call: format!(
                "{name}.try_into().expect(\"{function}: `{}` does not fit the native int\")",
                arg.name
            ),
        },
        ArgKind::Str => Translated {
            param: Some(format!("{name}: &std::ffi::CStr")),
            call: format!("{name}.as_ptr()"),
        },
    };

    Ok(translated)
}

/// The wrapper type a kind is declared with, if it needs an import.
pub fn wrapper_type(kind: ArgKind) -> Option<&'static str> {
    match kind {
        ArgKind::Handle => Some(HANDLE_TYPE),
        ArgKind::Float => Some(FLOAT_TYPE),
        ArgKind::Vec2 => Some(VEC2_TYPE),
        ArgKind::Vec3 => Some(VEC3_TYPE),
        ArgKind::UInt | ArgKind::Str => None,
    }
}
