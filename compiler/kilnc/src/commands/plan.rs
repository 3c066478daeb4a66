//! The `plan` command: plan every requested instantiation and describe the
//! resulting metadata records.

use std::fmt::Write as _;

use kiln_metadata::{CanonicalCache, CanonicalizationResolver, MetadataAccess, Planner};
use serde::Serialize;

use super::{emit_diagnostics, planner_config, write_out, Streams};
use crate::manifest::Program;
use crate::{DriverError, Options};

#[derive(Serialize)]
struct LayoutSummary {
    size: u64,
    align: u32,
    stride: u64,
    extra_inhabitants: u32,
}

#[derive(Serialize)]
struct AccessSummary {
    strategy: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caching_token: Option<String>,
    /// Record the runtime request canonicalizes to.
    #[serde(skip_serializing_if = "Option::is_none")]
    resolves_to: Option<String>,
}

#[derive(Serialize)]
struct PlanSummary<'a> {
    request: &'a str,
    #[serde(rename = "type")]
    ty: String,
    symbol: String,
    size_class: &'static str,
    kind: &'static str,
    flags: u64,
    layout: LayoutSummary,
    value_witnesses: String,
    type_descriptor: String,
    arguments: Vec<String>,
    field_offsets: Vec<u32>,
    offset_to_first_field: usize,
    extra_data_words: usize,
    access: AccessSummary,
}

impl<'a> PlanSummary<'a> {
    fn new(
        program: &Program,
        request: &'a str,
        access: &MetadataAccess,
        resolver: CanonicalizationResolver<'_>,
    ) -> Self {
        let d = access.descriptor();
        let access = match access {
            MetadataAccess::Direct(_) => AccessSummary {
                strategy: "direct",
                caching_token: None,
                resolves_to: None,
            },
            MetadataAccess::Runtime(request) => AccessSummary {
                strategy: if request.prespecialized {
                    "runtime-canonicalize"
                } else {
                    "runtime-instantiate"
                },
                caching_token: Some(request.caching_token.clone()),
                resolves_to: Some(resolver.resolve(request).symbol.clone()),
            },
        };
        PlanSummary {
            request,
            ty: program.table.display(&d.ty),
            symbol: d.symbol.clone(),
            size_class: d.size_class.as_str(),
            kind: d.kind.as_str(),
            flags: d.flags.bits(),
            layout: LayoutSummary {
                size: d.layout.size,
                align: d.layout.align,
                stride: d.layout.stride(),
                extra_inhabitants: d.layout.extra_inhabitants,
            },
            value_witnesses: d.value_witnesses.symbol.clone(),
            type_descriptor: d.type_descriptor.clone(),
            arguments: d
                .argument_references
                .iter()
                .map(|arg| arg.symbol.clone())
                .collect(),
            field_offsets: d.field_offsets.clone(),
            offset_to_first_field: d.offset_to_first_field,
            extra_data_words: d.extra_data_words,
            access,
        }
    }

    fn render(&self, out: &mut String) {
        let join = |items: &[String]| {
            if items.is_empty() {
                "-".to_owned()
            } else {
                items.join(", ")
            }
        };
        let _ = writeln!(out, "{}", self.ty);
        let _ = writeln!(out, "  symbol:      {}", self.symbol);
        let _ = writeln!(out, "  class:       {} {}", self.size_class, self.kind);
        let _ = writeln!(
            out,
            "  layout:      size {} align {} stride {} extra inhabitants {}",
            self.layout.size, self.layout.align, self.layout.stride, self.layout.extra_inhabitants
        );
        let _ = writeln!(out, "  witnesses:   {}", self.value_witnesses);
        let _ = writeln!(out, "  descriptor:  {}", self.type_descriptor);
        let _ = writeln!(out, "  arguments:   {}", join(&self.arguments));
        let offsets: Vec<String> = self.field_offsets.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "  offsets:     {}", join(&offsets));
        let _ = writeln!(
            out,
            "  words:       first field {} extra data {}",
            self.offset_to_first_field, self.extra_data_words
        );
        let _ = writeln!(out, "  flags:       {:#x}", self.flags);
        let _ = write!(out, "  access:      {}", self.access.strategy);
        if let Some(token) = &self.access.caching_token {
            let _ = write!(out, " via {token}");
        }
        if let Some(resolved) = &self.access.resolves_to {
            let _ = write!(out, " -> {resolved}");
        }
        out.push('\n');
    }
}

/// Plan every request in `program`.
pub fn plan(
    program: &Program,
    options: &Options,
    cache: &CanonicalCache,
    streams: &mut Streams<'_>,
) -> Result<usize, DriverError> {
    let planner = Planner::with_cache(&program.table, planner_config(program, options), cache);
    let resolver = CanonicalizationResolver::new(cache);

    let mut summaries = Vec::with_capacity(program.requests.len());
    let mut diagnostics = Vec::new();
    for (text, ty) in &program.requests {
        match planner.access(ty) {
            Ok(access) => summaries.push(PlanSummary::new(program, text, &access, resolver)),
            Err(err) => diagnostics.push(err.into_diagnostic()),
        }
    }

    let errors = emit_diagnostics(program, options, diagnostics, streams);

    if options.json {
        let json = serde_json::to_string_pretty(&summaries)
            .map_err(|e| DriverError::Output(std::io::Error::other(e)))?;
        write_out(streams, &json)?;
        write_out(streams, "\n")?;
    } else {
        let mut text = String::new();
        for summary in &summaries {
            summary.render(&mut text);
        }
        write_out(streams, &text)?;
    }
    Ok(errors)
}
