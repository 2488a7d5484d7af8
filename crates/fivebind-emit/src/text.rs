//! The hand-written `text` module.
//!
//! This is the one output unit that is not derived from the descriptor
//! table. Text marshals an arbitrary byte sequence into a C string, which
//! needs its own validation (interior NUL bytes) and a fallible signature,
//! so the wrapper is authored once here and emitted verbatim.

use crate::assemble::{use_line, AssembleOptions, AssembledUnit};
use crate::banner::{render_banner, Origin};

/// Module name of the hand-written unit.
pub const TEXT_MODULE_NAME: &str = "text";

/// Native entry point the text wrapper calls.
pub const TEXT_SYMBOL: &str = "libfivestd_text";

/// Body of the text unit, emitted as-is.
pub const TEXT_MODULE: &str = r#"/// # Text <a name="text"></a>
impl Tree {

    /// Renders `txt` as a 2D shape with its baseline starting at `pos`.
    ///
    /// The bytes are copied into a NUL-terminated buffer that lives until the
    /// native call returns. Fails before reaching native code if `txt`
    /// contains an interior NUL byte.
    pub fn text(txt: impl Into<Vec<u8>>, pos: TreeVec2) -> Result<Self, std::ffi::NulError> {
        let txt = std::ffi::CString::new(txt)?;
        let pos = sys::tvec2 { x: pos.x.0, y: pos.y.0 };
        Ok(Self(unsafe { sys::libfivestd_text(txt.as_ptr(), pos) }))
    }
}
"#;

/// Render the complete text unit: banner, optional imports, verbatim body.
pub fn text_module(options: &AssembleOptions) -> String {
    let mut out = render_banner(TEXT_MODULE_NAME, Origin::Template, &options.provenance);
    if let Some(root) = &options.import_root {
        out.push('\n');
        out.push_str(&use_line(root, &["sys", "Tree", "TreeVec2"]));
    }
    out.push('\n');
    out.push_str(TEXT_MODULE);
    out
}

/// The text unit packaged like a table-derived one.
pub fn text_unit(options: &AssembleOptions) -> AssembledUnit {
    AssembledUnit {
        module: TEXT_MODULE_NAME.to_string(),
        convention: None,
        function_count: 1,
        source: text_module(options),
    }
}
