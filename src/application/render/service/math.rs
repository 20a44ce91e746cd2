use katex::{OptsBuilder, OutputType};

use crate::application::render::types::RenderError;

/// KaTeX-backed typesetting for formula marker spans. Wrapped in a struct
/// so the pipeline can run without it when typesetting is not wanted.
#[derive(Debug, Default, Clone, Copy)]
pub struct MathRenderer;

impl MathRenderer {
    /// Render an expression to inline KaTeX HTML.
    pub(crate) fn typeset(&self, expression: &str) -> Result<String, RenderError> {
        let mut builder = OptsBuilder::default();
        builder.display_mode(false);
        builder.output_type(OutputType::Html);

        let opts = builder
            .build()
            .map_err(|err| RenderError::math(format!("failed to build KaTeX options: {err}")))?;

        katex::render_with_opts(expression, opts)
            .map_err(|err| RenderError::math(format!("KaTeX rendering failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typesets_simple_expression() {
        let html = MathRenderer.typeset("a^2+b^2").expect("katex");
        assert!(html.contains("katex"));
    }

    #[test]
    fn invalid_expression_is_an_error() {
        assert!(MathRenderer.typeset("\\invalidmacroname{").is_err());
    }
}
