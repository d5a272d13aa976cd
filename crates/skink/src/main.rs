use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use skink_core::Value;
use skink_eval::Interpreter;

#[derive(Parser)]
#[command(name = "skink", about = "Skink: a small reference-counted Scheme dialect")]
struct Cli {
    /// Script file to run
    file: Option<String>,

    /// Evaluate an expression and print its result
    #[arg(short, long)]
    eval: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let interpreter = Interpreter::new();

    if let Some(expr) = &cli.eval {
        match run(&interpreter, expr) {
            Ok(val) => {
                if !matches!(val, Value::Nil) {
                    println!("{val}");
                }
            }
            Err(msg) => {
                eprintln!("{msg}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Some(file) = &cli.file {
        let text = match std::fs::read_to_string(file) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("error: reading {file}: {e}");
                std::process::exit(1);
            }
        };
        if let Err(msg) = run(&interpreter, &text) {
            eprintln!("{msg}");
            std::process::exit(1);
        }
        return;
    }

    repl(interpreter);
}

/// Run a program, folding read and eval failures into a tagged message
/// for the terminal. Read errors get the line number the reader kept
/// out of the in-language error text.
fn run(interpreter: &Interpreter, input: &str) -> Result<Value, String> {
    match interpreter.eval_source(input) {
        Err(e) => Err(format!("error [parse]: {e} (line {})", e.line())),
        Ok(v) if v.is_error() => Err(format!("error [eval]: {}", v.text())),
        Ok(v) => Ok(v),
    }
}

fn repl(interpreter: Interpreter) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("error: cannot open terminal: {e}");
            std::process::exit(1);
        }
    };
    let history_path = dirs_path().join("history.txt");
    let _ = rl.load_history(&history_path);

    println!("Skink v{}", env!("CARGO_PKG_VERSION"));
    println!("Type ,help for help, ,quit to exit\n");

    let mut buffer = String::new();
    let mut in_multiline = false;

    loop {
        let prompt = if in_multiline { "  ... " } else { "skink> " };
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();

                // Handle REPL commands
                if !in_multiline {
                    match trimmed {
                        ",quit" | ",exit" | ",q" => break,
                        ",help" | ",h" => {
                            print_help();
                            continue;
                        }
                        ",env" => {
                            print_env(&interpreter);
                            continue;
                        }
                        _ => {}
                    }
                }

                if in_multiline {
                    buffer.push('\n');
                    buffer.push_str(&line);
                } else {
                    buffer = line.clone();
                }

                // Keep reading until the parens balance
                if !is_balanced(&buffer) {
                    in_multiline = true;
                    continue;
                }

                in_multiline = false;
                let input = buffer.trim().to_string();
                buffer.clear();

                if input.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&input);

                match run(&interpreter, &input) {
                    Ok(val) => {
                        if !matches!(val, Value::Nil) {
                            println!("{val}");
                        }
                    }
                    Err(msg) => eprintln!("{msg}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                if in_multiline {
                    buffer.clear();
                    in_multiline = false;
                    println!("^C");
                    continue;
                }
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("error: {e}");
                break;
            }
        }
    }

    let _ = std::fs::create_dir_all(dirs_path());
    let _ = rl.save_history(&history_path);
    println!("Goodbye!");
}

/// Balanced when every paren and bracket closes outside of strings and
/// comments. Used to decide whether the REPL should keep reading.
fn is_balanced(input: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut in_comment = false;
    let mut escape = false;
    for ch in input.chars() {
        if in_comment {
            if ch == '\n' {
                in_comment = false;
            }
            continue;
        }
        if escape {
            escape = false;
            continue;
        }
        if ch == '\\' && in_string {
            escape = true;
            continue;
        }
        if ch == '"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        match ch {
            ';' => in_comment = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            _ => {}
        }
    }
    depth <= 0 && !in_string
}

fn print_help() {
    println!("Skink REPL Commands:");
    println!("  ,quit / ,q    Exit the REPL");
    println!("  ,help / ,h    Show this help");
    println!("  ,env          Show defined variables");
    println!();
    println!("Special Forms:");
    println!("  {}", skink_eval::SPECIAL_FORM_NAMES.join(", "));
}

fn print_env(interpreter: &Interpreter) {
    let mut bindings: Vec<_> = interpreter
        .global_env
        .locals()
        .into_iter()
        .filter(|(_, v)| !matches!(v, Value::NativeFn(_)))
        .collect();
    bindings.sort_by(|(a, _), (b, _)| a.cmp(b));
    if bindings.is_empty() {
        println!("(no user-defined bindings)");
    } else {
        for (name, val) in bindings {
            println!("  {name} = {val}");
        }
    }
}

fn dirs_path() -> std::path::PathBuf {
    std::env::var("HOME")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join(".skink")
}
