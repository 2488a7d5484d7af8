//! Wrapper emission for a single stdlib function.
//!
//! Each wrapper declares its parameters, marshals every argument into its
//! native form, performs exactly one call into `sys` inside an `unsafe`
//! block, and re-wraps the returned handle in `Self`.

use fivebind_core::descriptor::{ArgKind, FunctionDescriptor};
use log::trace;

use crate::convention::CallingConvention;
use crate::error::{EmitError, Result};
use crate::naming::NamingPolicy;
use crate::translate::{arg_kind, translate};

/// Parameter and call-argument lists for one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Emitted wrapper name.
    pub name: String,
    /// Explicit parameters, in argument order (the receiver is not listed).
    pub params: Vec<String>,
    /// Native call expressions, one per argument.
    pub calls: Vec<String>,
    /// Whether the wrapper takes `self`.
    pub receiver: bool,
}

impl Signature {
    /// The parameter list as written between the wrapper's parentheses.
    pub fn param_list(&self) -> String {
        let mut params = Vec::with_capacity(self.params.len() + 1);
        if self.receiver {
            params.push("self".to_string());
        }
        params.extend(self.params.iter().cloned());
        params.join(", ")
    }

    /// The argument list of the native call.
    pub fn call_list(&self) -> String {
        self.calls.join(", ")
    }
}

/// Check that a receiver-style function starts with a tree handle.
pub fn check_receiver(descriptor: &FunctionDescriptor) -> Result<()> {
    let first = descriptor
        .args
        .first()
        .ok_or_else(|| EmitError::MissingReceiver {
            function: descriptor.public_name.clone(),
        })?;

    match arg_kind(first, &descriptor.public_name)? {
        ArgKind::Handle => Ok(()),
        other => Err(EmitError::ReceiverNotHandle {
            function: descriptor.public_name.clone(),
            found: other.to_string(),
        }),
    }
}

/// Translate every argument of `descriptor` under `convention`.
pub fn signature(
    descriptor: &FunctionDescriptor,
    convention: CallingConvention,
    naming: &NamingPolicy,
) -> Result<Signature> {
    if convention.uses_receiver() {
        check_receiver(descriptor)?;
    }

    let mut params = Vec::with_capacity(descriptor.arity());
    let mut calls = Vec::with_capacity(descriptor.arity());
    for arg in &descriptor.args {
        let translated = translate(arg, convention, &descriptor.public_name)?;
        if let Some(param) = translated.param {
            params.push(param);
        }
        calls.push(translated.call);
    }

    Ok(Signature {
        name: naming.function_name(&descriptor.public_name),
        params,
        calls,
        receiver: convention.uses_receiver(),
    })
}

/// Render the complete wrapper for `descriptor`, indented for an `impl` block.
pub fn emit(
    descriptor: &FunctionDescriptor,
    convention: CallingConvention,
    naming: &NamingPolicy,
) -> Result<String> {
    let sig = signature(descriptor, convention, naming)?;
    trace!(
        "emitting {} ({convention}, {} params, {} call args)",
        descriptor.public_name,
        sig.params.len(),
        sig.calls.len()
    );

    let mut out = String::new();
    if let Some(doc) = &descriptor.doc {
        for line in doc.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                out.push_str("    ///\n");
            } else {
                out.push_str(&format!("    /// {line}\n"));
            }
        }
    }
    out.push_str(&format!(
        "    pub fn {}({}) -> Self {{\n",
        sig.name,
        sig.param_list()
    ));
    out.push_str(&format!(
        "        Self(unsafe {{ sys::{}({}) }})\n",
        descriptor.raw_name,
        sig.call_list()
    ));
    out.push_str("    }\n");
    Ok(out)
}
