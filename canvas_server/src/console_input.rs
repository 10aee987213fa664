use std::io::stdin;
use std::thread;

use anyhow::{bail, Context};
use tracing::warn;

use crate::context::CanvasContextRef;

pub fn console_input_thread(context_ref: CanvasContextRef) {
    thread::spawn(move || {
        pollster::block_on(console_input_loop(context_ref))
    });
}

pub async fn console_input_loop(context_ref: CanvasContextRef) {
    loop {
        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("console input closed: {e}");
                break;
            }
        }
        match process_console_input(input.trim(), &context_ref).await {
            Ok(output) => println!("{output}"),
            Err(e) => println!("error: {e}"),
        }
    }
}

pub async fn process_console_input(input: &str, context_ref: &CanvasContextRef) -> anyhow::Result<String> {
    let (command, rem) = match input.find(' ') {
        Some(i) => (&input[..i], input[i + 1..].trim()),
        None => (input, ""),
    };

    let orchestrator = &context_ref.orchestrator;
    match command {
        "status" => {
            let config = orchestrator.config();
            let grid = orchestrator.grid();
            Ok(format!(
                "size: {0}x{0}\ncooldown: {1}s\npalette: {2}\npainted cells: {3}\ngeneration: {4}\nviewers: {5}",
                config.size,
                config.cooldown_seconds,
                config.palette.describe(),
                grid.painted_cells(),
                grid.generation(),
                context_ref.viewer_count().await,
            ))
        }
        "cell" => {
            let mut parts = rem.split_whitespace();
            let x: usize = parts.next().context("usage: cell <x> <y>")?.parse()?;
            let y: usize = parts.next().context("usage: cell <x> <y>")?.parse()?;
            let color = orchestrator.grid().cell(x, y)?;
            Ok(match color {
                Some(color) => format!("({x}, {y}) {color}"),
                None => format!("({x}, {y}) unpainted"),
            })
        }
        "" => Ok(String::new()),
        _ => bail!("input not recognized: {command}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_context;

    #[tokio::test]
    async fn status_reports_configuration() {
        let context_ref = test_context();
        let output = process_console_input("status", &context_ref).await.unwrap();
        assert!(output.contains("size: 4x4"));
        assert!(output.contains("cooldown: 60s"));
        assert!(output.contains("painted cells: 0"));
        assert!(output.contains("viewers: 0"));
    }

    #[tokio::test]
    async fn cell_reports_color() {
        let context_ref = test_context();
        let color = canvas::Palette::default().validate("#FF0000").unwrap();
        context_ref.orchestrator.grid().write(1, 2, color).unwrap();
        assert_eq!(process_console_input("cell 1 2", &context_ref).await.unwrap(), "(1, 2) #FF0000");
        assert_eq!(process_console_input("cell 0 0", &context_ref).await.unwrap(), "(0, 0) unpainted");
    }

    #[tokio::test]
    async fn bad_commands_are_errors() {
        let context_ref = test_context();
        assert!(process_console_input("cell 9 9", &context_ref).await.is_err());
        assert!(process_console_input("cell 1", &context_ref).await.is_err());
        assert!(process_console_input("cell a b", &context_ref).await.is_err());
        assert!(process_console_input("save", &context_ref).await.is_err());
    }
}
