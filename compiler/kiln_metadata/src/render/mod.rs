//! Textual IR for planned records.
//!
//! Records print as packed LLVM constants and accesses as the instruction
//! sequence generated code would contain, so that a FileCheck-style test
//! can verify planner output without a code generator.
//!
//! ```text
//! @"_kn_M$Pair$G...$E$MN" = linkonce_odr hidden constant
//!     <{ ptr, i64, ptr, ptr, ptr, i32, i32, i64 }> <{ ... }>, align 8
//! ```

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use crate::{MetadataAccess, MetadataDescriptor, TrailingFlags};

/// Runtime entry point that canonicalizes a prespecialized record.
pub const CANONICALIZE_FN: &str = "kiln_getCanonicalSpecializedMetadata";

/// Runtime entry point that instantiates a generic record.
pub const INSTANTIATE_FN: &str = "kiln_getGenericMetadata";

fn global(symbol: &str) -> String {
    format!("@\"{symbol}\"")
}

fn int_type(descriptor: &MetadataDescriptor) -> &'static str {
    if descriptor.target.pointer_width() == 64 {
        "i64"
    } else {
        "i32"
    }
}

/// Address of a record as the runtime sees it, past the prefix words.
fn full_type_address(descriptor: &MetadataDescriptor) -> String {
    format!(
        "ptr getelementptr inbounds (%swift.full_type, ptr {}, i32 0, i32 2)",
        global(&descriptor.symbol)
    )
}

fn linkage(descriptor: &MetadataDescriptor) -> &'static str {
    if descriptor
        .flags
        .contains(TrailingFlags::CANONICAL_STATIC_SPECIALIZATION)
    {
        "hidden constant"
    } else if descriptor.flags.contains(TrailingFlags::STATIC_SPECIALIZATION) {
        // Other modules may emit the same record.
        "linkonce_odr hidden constant"
    } else {
        "constant"
    }
}

/// Render the build-time definition of a record.
///
/// Instantiated records have no build-time definition and render as `None`.
pub fn render_record(descriptor: &MetadataDescriptor) -> Option<String> {
    if !descriptor.is_canonical() {
        return None;
    }
    let int = int_type(descriptor);

    let mut types: Vec<&str> = vec!["ptr", int, "ptr"];
    let mut values = vec![
        format!(
            "ptr getelementptr inbounds (%swift.vwtable, ptr {}, i32 0, i32 0)",
            global(&descriptor.value_witnesses.symbol)
        ),
        format!("{int} {}", descriptor.kind.value()),
        format!("ptr {}", global(&descriptor.type_descriptor)),
    ];

    for arg in &descriptor.argument_references {
        types.push("ptr");
        values.push(format!("ptr {}", global(&arg.symbol)));
    }

    for offset in &descriptor.field_offsets {
        types.push("i32");
        values.push(format!("i32 {offset}"));
    }
    // The offset vector fills whole words.
    let per_word = usize::try_from(descriptor.target.pointer_size() / 4).unwrap_or(1);
    let count = descriptor.field_offsets.len();
    if per_word > 1 && count % per_word != 0 {
        for _ in count % per_word..per_word {
            types.push("i32");
            values.push("i32 0".to_owned());
        }
    }

    if descriptor.has_trailing_flags() {
        types.push("i64");
        values.push(format!("i64 {}", descriptor.flags.bits()));
    }

    Some(format!(
        "{} = {} <{{ {} }}> <{{ {} }}>, align {}",
        global(&descriptor.symbol),
        linkage(descriptor),
        types.join(", "),
        values.join(", "),
        descriptor.target.pointer_align()
    ))
}

/// Render how generated code obtains the record of `access`.
///
/// Direct accesses render as a constant operand; runtime requests as a call
/// followed by extraction of the metadata from the response.
pub fn render_access(access: &MetadataAccess) -> String {
    match access {
        MetadataAccess::Direct(descriptor) => full_type_address(descriptor),
        MetadataAccess::Runtime(request) => {
            let descriptor = &request.descriptor;
            let int = int_type(descriptor);
            let mut call = String::with_capacity(160);
            if request.prespecialized {
                let _ = write!(
                    call,
                    "%0 = call swiftcc %swift.metadata_response \
                     @{CANONICALIZE_FN}({int} 0, {}, ptr {})",
                    full_type_address(descriptor),
                    global(&request.caching_token)
                );
            } else {
                let _ = write!(
                    call,
                    "%0 = call swiftcc %swift.metadata_response @{INSTANTIATE_FN}({int} 0, ptr {}",
                    global(&descriptor.type_descriptor)
                );
                for arg in &descriptor.argument_references {
                    let _ = write!(call, ", {}", full_type_address(arg));
                }
                call.push(')');
            }
            call.push_str("\n%1 = extractvalue %swift.metadata_response %0, 0");
            call
        }
    }
}

/// Render every distinct build-time record reachable from `roots`, ordered
/// by symbol.
pub fn render_module<'d>(roots: impl IntoIterator<Item = &'d Arc<MetadataDescriptor>>) -> String {
    let mut records: BTreeMap<&str, &MetadataDescriptor> = BTreeMap::new();
    let mut stack: Vec<&MetadataDescriptor> = roots.into_iter().map(|d| &**d).collect();
    while let Some(descriptor) = stack.pop() {
        if records.insert(&descriptor.symbol, descriptor).is_some() {
            continue;
        }
        stack.extend(descriptor.argument_references.iter().map(|d| &**d));
    }

    let mut out = String::new();
    for descriptor in records.values() {
        if let Some(record) = render_record(descriptor) {
            out.push_str(&record);
            out.push('\n');
        }
    }
    out
}
