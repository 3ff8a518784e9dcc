use anyhow::Result;
use colored::{Color, Colorize};
use std::io::Write;

pub type EmitResult = Result<()>;

#[derive(Debug, Clone)]
pub struct EmitContext {
    pub indent_level: usize,
    pub indent_chars: String,
    pub use_colors: bool,
}

impl EmitContext {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_chars: "  ".to_string(),
            use_colors: true,
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn get_indent(&self) -> String {
        self.indent_chars.repeat(self.indent_level)
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Emitter<T: ?Sized> {
    fn emit<W: Write>(&self, item: &T, writer: &mut W, context: &mut EmitContext) -> EmitResult;

    fn context(&self) -> EmitContext {
        EmitContext::new()
    }

    fn emit_to_string(&self, item: &T) -> Result<String> {
        let mut buffer = Vec::new();
        let mut context = self.context();
        self.emit(item, &mut buffer, &mut context)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct EmitHelper;

impl EmitHelper {
    pub fn write_line<W: Write>(writer: &mut W, context: &EmitContext, text: &str) -> EmitResult {
        writeln!(writer, "{}{}", context.get_indent(), text)?;
        Ok(())
    }

    pub fn write_colored_line<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        text: &str,
        color: Color,
    ) -> EmitResult {
        if context.use_colors {
            writeln!(writer, "{}{}", context.get_indent(), text.color(color))?;
        } else {
            Self::write_line(writer, context, text)?;
        }
        Ok(())
    }

    /// IR comments start with `;`.
    pub fn write_comment<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        comment: &str,
    ) -> EmitResult {
        Self::write_colored_line(writer, context, &format!("; {}", comment), Color::Green)
    }

    pub fn write_section<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        title: &str,
    ) -> EmitResult {
        Self::write_colored_line(
            writer,
            context,
            &format!("; === {} ===", title),
            Color::Cyan,
        )
    }
}
