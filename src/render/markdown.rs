use super::{FileDoc, RenderOptions, Renderer};
use crate::error::AmalgoError;

/// Markdown output: a heading per file followed by a fenced code block.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn file_extension(&self) -> &'static str {
        ".md"
    }

    fn render(&self, files: &[FileDoc], opts: &RenderOptions) -> Result<Vec<u8>, AmalgoError> {
        let mut out = Vec::new();

        if files.is_empty() {
            out.extend_from_slice(b"_No files found._\n");
            return Ok(out);
        }

        let heading = "#".repeat(opts.heading_level.clamp(1, 6));

        for file in files {
            out.extend_from_slice(format!("{heading} {}\n", file.rel_path).as_bytes());
            out.extend_from_slice(format!("```{}\n", language_for(&file.ext)).as_bytes());
            out.extend_from_slice(&file.content);
            if file.content.last() != Some(&b'\n') {
                out.push(b'\n');
            }
            out.extend_from_slice(b"```\n\n");
        }

        Ok(out)
    }
}

/// Fence tag for a dotted extension. Unknown extensions get no tag.
fn language_for(ext: &str) -> &'static str {
    match ext.to_lowercase().trim_start_matches('.') {
        "go"                  => "go",
        "rs"                  => "rust",
        "py"                  => "python",
        "js"                  => "javascript",
        "ts"                  => "typescript",
        "java"                => "java",
        "c"                   => "c",
        "cpp"                 => "cpp",
        "cs"                  => "csharp",
        "rb"                  => "ruby",
        "php"                 => "php",
        "sh" | "bash" | "zsh" => "bash",
        "html"                => "html",
        "css"                 => "css",
        "scss"                => "scss",
        "json"                => "json",
        "yaml" | "yml"        => "yaml",
        "xml"                 => "xml",
        "toml"                => "toml",
        "sql"                 => "sql",
        "md"                  => "markdown",
        "txt"                 => "text",
        _                     => "",
    }
}
