use terminal_size::{terminal_size, Width};

use crate::api::{ParsedArguments, SchemaRegistry};
use crate::constant::*;
use crate::model::MetaValue;
use crate::parser::interface::ColumnRenderer;

const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 2;
const REQUIRED: &str = "required";

/// One help row: `left | middle | rights...`.
struct Row {
    left: String,
    middle: String,
    rights: Vec<String>,
}

impl Row {
    fn new(left: impl Into<String>, middle: impl Into<String>, rights: Vec<String>) -> Self {
        Self {
            left: left.into(),
            middle: middle.into(),
            rights,
        }
    }
}

/// Renders usage and help for a command line.
#[derive(Debug, Clone)]
pub(crate) struct Printer {
    terminal_width: Option<usize>,
}

impl Printer {
    /// A printer sized to the attached terminal, if any.
    pub(crate) fn terminal() -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::new(terminal_width)
    }

    /// Without a `terminal_width`, descriptions are never wrapped.
    pub(crate) fn new(terminal_width: Option<usize>) -> Self {
        Self { terminal_width }
    }

    /// The usage line, ex: `usage: prog push [<options>] <args>`.
    pub(crate) fn usage(&self, registry: &SchemaRegistry, parsed: &ParsedArguments) -> String {
        let command = parsed.command();
        let schema = registry.get_schema(command);
        let mut summary = vec![format!("usage: {}", filename(parsed))];

        if registry.has_commands() {
            if registry.has_command(command) {
                summary.push(command.to_string());
            } else {
                summary.push("[<command>]".to_string());
            }
        }

        if schema.has_options() {
            summary.push("[<options>]".to_string());
        }

        if schema.args().iter().any(|arg| arg.is_required()) {
            summary.push("<args>".to_string());
        } else if !schema.args().is_empty() {
            summary.push("[<args>]".to_string());
        }

        summary.join(" ")
    }

    /// The full help, one line per item.
    ///
    /// Lists the registered commands when a command is expected but was not (validly) given,
    /// otherwise documents the options and arguments of the resolved command.
    pub(crate) fn help(&self, registry: &SchemaRegistry, parsed: &ParsedArguments) -> Vec<String> {
        let command = parsed.command();
        let mut lines = vec![self.usage(registry, parsed)];

        if registry.has_commands() && !registry.has_command(command) {
            let description = registry
                .schema(WILDCARD)
                .map(|schema| schema.description())
                .unwrap_or_default();
            let rows: Vec<Row> = registry
                .commands()
                .map(|(name, schema)| Row::new(name, schema.description(), Vec::default()))
                .collect();

            let renderer = self.renderer(&rows);
            push_paragraph(&mut lines, description);
            push_section(&mut lines, "COMMANDS:", &rows, &renderer);
            return lines;
        }

        let schema = registry.get_schema(command);
        let mut options: Vec<Row> = schema
            .options()
            .map(|option| {
                let flags = match option.short() {
                    Some(short) => format!("--{}, -{short}", option.name()),
                    None => format!("--{}", option.name()),
                };
                let required = if option.is_required() { REQUIRED } else { "" };
                Row::new(
                    flags,
                    option.description(),
                    vec![option.type_label(), required.to_string()],
                )
            })
            .collect();
        options.push(Row::new(
            format!("--{HELP_NAME}, -{HELP_SHORT}"),
            HELP_MESSAGE,
            Vec::default(),
        ));
        let arguments: Vec<Row> = schema
            .args()
            .iter()
            .map(|arg| {
                let required = if arg.is_required() { REQUIRED } else { "" };
                Row::new(
                    arg.name(),
                    arg.description(),
                    vec![String::default(), required.to_string()],
                )
            })
            .collect();
        let renderer = self.renderer(options.iter().chain(arguments.iter()));

        push_paragraph(&mut lines, schema.description());
        push_section(&mut lines, "OPTIONS:", &options, &renderer);
        if !arguments.is_empty() {
            push_section(&mut lines, "ARGUMENTS:", &arguments, &renderer);
        }

        lines
    }

    /// Size the columns to fit every one of `rows`.
    fn renderer<'r>(&self, rows: impl IntoIterator<Item = &'r Row>) -> ColumnRenderer {
        let mut left = 0;
        let mut middle = 0;
        let mut rights: Vec<usize> = Vec::default();

        for row in rows {
            left = std::cmp::max(left, row.left.chars().count());
            middle = std::cmp::max(middle, row.middle.chars().count());

            for (i, right) in row.rights.iter().enumerate() {
                let width = right.chars().count();
                match rights.get_mut(i) {
                    Some(current) => *current = std::cmp::max(*current, width),
                    None => rights.push(width),
                }
            }
        }

        match self.terminal_width {
            Some(total) => {
                ColumnRenderer::guided(MAIN_INDENT, PADDING_WIDTH, left, middle, rights, total)
            }
            None => ColumnRenderer::new(MAIN_INDENT, PADDING_WIDTH, left, middle, rights),
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, rows: &[Row], renderer: &ColumnRenderer) {
    lines.push(String::default());
    lines.push(title.to_string());
    for row in rows {
        lines.extend(renderer.render(&row.left, &row.middle, &row.rights));
    }
}

fn push_paragraph(lines: &mut Vec<String>, paragraph: &str) {
    if !paragraph.is_empty() {
        lines.push(String::default());
        lines.push(paragraph.to_string());
    }
}

fn filename(parsed: &ParsedArguments) -> &str {
    parsed
        .get_meta(FILENAME_META)
        .and_then(MetaValue::as_text)
        .unwrap_or_default()
}
