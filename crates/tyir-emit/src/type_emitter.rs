use anyhow::Result;
use colored::{Color, Colorize};
use serde::Serialize;
use std::io::Write;
use tyir_core::{Program, ValueKind};

use crate::{
    config::{EmitterConfig, OutputFormat},
    emitter::{EmitContext, EmitHelper, EmitResult, Emitter},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoweredEntry {
    pub source: String,
    pub ir: String,
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<u64>,
}

/// Snapshot of everything a program has lowered so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeListing {
    pub pointer_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triple: Option<String>,
    pub named_structs: Vec<String>,
    pub types: Vec<LoweredEntry>,
}

impl TypeListing {
    pub fn from_program(program: &Program<'_>, with_layout: bool) -> Self {
        let ctx = program.ctx();
        let named_structs = ctx
            .named_structs()
            .filter_map(|(_, ty)| ctx.definition(ty))
            .collect();
        let types = program
            .lowered()
            .map(|ty| {
                let (size, align) = if with_layout {
                    (ctx.size_of(ty.ir()).ok(), ctx.align_of(ty.ir()).ok())
                } else {
                    (None, None)
                };
                LoweredEntry {
                    source: program.types().display(ty.source()),
                    ir: ctx.display(ty.ir()).to_string(),
                    kind: ty.kind(),
                    size,
                    align,
                }
            })
            .collect();
        Self {
            pointer_size: program.target().pointer_size(),
            triple: program.target().triple().map(str::to_string),
            named_structs,
            types,
        }
    }
}

pub struct TypeEmitter {
    config: EmitterConfig,
}

impl TypeEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    fn write_entry<W: Write>(
        &self,
        writer: &mut W,
        context: &EmitContext,
        entry: &LoweredEntry,
    ) -> EmitResult {
        let mut line = if context.use_colors {
            format!("{} => {}", entry.source.bold(), entry.ir.color(Color::Blue))
        } else {
            format!("{} => {}", entry.source, entry.ir)
        };
        if self.config.include_value_kinds {
            line.push_str(&format!(" ; {}", entry.kind));
        }
        if let (Some(size), Some(align)) = (entry.size, entry.align) {
            line.push_str(&format!(" ; size {} align {}", size, align));
        }
        EmitHelper::write_line(writer, context, &line)
    }

    fn emit_text<W: Write>(
        &self,
        listing: &TypeListing,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let target = match &listing.triple {
            Some(triple) => format!("target: {} ({}-byte pointers)", triple, listing.pointer_size),
            None => format!("target: {}-byte pointers", listing.pointer_size),
        };
        EmitHelper::write_comment(writer, context, &target)?;

        EmitHelper::write_section(writer, context, "Named structs")?;
        context.indent();
        if listing.named_structs.is_empty() {
            EmitHelper::write_comment(writer, context, "none")?;
        }
        for def in &listing.named_structs {
            EmitHelper::write_colored_line(writer, context, def, Color::Yellow)?;
        }
        context.dedent();

        EmitHelper::write_section(writer, context, "Lowered types")?;
        context.indent();
        for entry in &listing.types {
            self.write_entry(writer, context, entry)?;
        }
        context.dedent();
        Ok(())
    }
}

impl Default for TypeEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl<'a> Emitter<Program<'a>> for TypeEmitter {
    fn emit<W: Write>(
        &self,
        program: &Program<'a>,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let listing = TypeListing::from_program(program, self.config.include_layout);
        match self.config.format {
            OutputFormat::Text => self.emit_text(&listing, writer, context),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, &listing)?;
                writeln!(writer)?;
                Ok(())
            }
        }
    }

    fn context(&self) -> EmitContext {
        EmitContext {
            indent_level: 0,
            indent_chars: " ".repeat(self.config.indent),
            use_colors: self.config.use_colors,
        }
    }
}

/// Convenience wrapper for a plain-text listing.
pub fn listing_to_string(program: &Program<'_>) -> Result<String> {
    TypeEmitter::new(EmitterConfig::plain()).emit_to_string(program)
}
