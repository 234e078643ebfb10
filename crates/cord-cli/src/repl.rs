//! An interactive read-eval-print loop.
//!
//! Much simpler than a full editor: read a line, track whether the brackets,
//! parens, quotes and word definitions seen so far are balanced, and once they
//! are, compile and run the accumulated buffer as one script against a
//! persistent context so word definitions and stack state survive between
//! inputs.

use std::rc::Rc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use cord_compiler::{compile, Parser as CordParser};
use cord_runtime::{exec, Context, Runtime};

fn history_path() -> Option<std::path::PathBuf> {
    dirs::data_dir().map(|dir| dir.join("cord").join("history.txt"))
}

/// Counts open/close structural characters, string-literal state, and
/// in-progress word definitions well enough to tell whether `buffer` is a
/// complete, parseable unit: `(`/`)`, `[`/`]`, `{`/`}` nest; a `"`
/// toggles string mode; a `:` opens a word definition that `;` closes.
///
/// A `:` that immediately follows a closed string (ignoring whitespace) is an
/// object-literal `"key": value` separator instead, since object keys are
/// always string literals — it doesn't open a word definition and has no
/// matching `;`.
fn is_balanced(buffer: &str) -> bool {
    let mut depth: i32 = 0;
    let mut word_open: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut last_nonspace: Option<char> = None;
    for c in buffer.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                last_nonspace = Some('"');
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' | '{' | ')' | ']' | '}' => {
                depth += if matches!(c, '(' | '[' | '{') { 1 } else { -1 };
                last_nonspace = Some(c);
            }
            ':' => {
                if last_nonspace != Some('"') {
                    word_open += 1;
                }
                last_nonspace = Some(':');
            }
            ';' => {
                word_open = (word_open - 1).max(0);
                last_nonspace = Some(';');
            }
            c if c.is_whitespace() => {}
            other => last_nonspace = Some(other),
        }
    }
    depth <= 0 && word_open <= 0 && !in_string
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_expression_is_immediately_balanced() {
        assert!(is_balanced("1 2 +"));
    }

    #[test]
    fn open_bracket_is_unbalanced() {
        assert!(!is_balanced("[ 1 2"));
        assert!(is_balanced("[ 1 2 ]"));
    }

    #[test]
    fn in_progress_word_definition_is_unbalanced_until_semicolon() {
        assert!(!is_balanced(": square dup *"));
        assert!(is_balanced(": square dup * ;"));
    }

    #[test]
    fn object_literal_colon_does_not_open_a_word_definition() {
        assert!(is_balanced(r#"{ "a": 1, "b": 2 }"#));
    }

    #[test]
    fn unterminated_string_is_unbalanced() {
        assert!(!is_balanced(r#""abc"#));
        assert!(is_balanced(r#""abc""#));
    }
}

pub fn run(runtime: Rc<Runtime>) {
    let mut editor = DefaultEditor::new().expect("terminal supports line editing");
    let history = history_path();
    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = editor.load_history(path);
    }

    let mut ctx = Context::new(runtime);
    let mut buffer = String::new();
    let mut line_no: usize = 1;

    loop {
        let prompt = if buffer.is_empty() { "cord> " } else { "....> " };
        match editor.readline(prompt) {
            Ok(line) => {
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&line);
                let _ = editor.add_history_entry(&line);

                if !is_balanced(&buffer) {
                    continue;
                }
                if !buffer.trim().is_empty() {
                    run_one(&mut ctx, &buffer, line_no);
                }
                line_no += 1;
                buffer.clear();
            }
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("cord: {e}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

fn run_one(ctx: &mut Context, source: &str, line_no: usize) {
    let filename: Rc<str> = Rc::from("<repl>");
    let tokens = match CordParser::with_start(source, filename, line_no, 1).parse() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("syntax error: {e}");
            return;
        }
    };
    let values = compile(&tokens, &ctx.runtime);
    for value in &values {
        if !exec(ctx, value) {
            if let Some(err) = ctx.current_error() {
                eprintln!("error: {err}");
            }
            ctx.clear_error();
            break;
        }
    }
    print_stack(ctx);
}

pub(crate) fn print_stack(ctx: &Context) {
    if ctx.stack.is_empty() {
        println!("(empty)");
        return;
    }
    let rendered: Vec<String> = ctx.stack.iter().map(|v| v.to_source()).collect();
    println!("{}", rendered.join(" "));
}
