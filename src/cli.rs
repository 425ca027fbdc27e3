//! # Chat no Terminal
//!
//! Conversa linha a linha pela entrada padrão, mostrando para cada frase
//! a intenção detectada, a confiança e a resposta. `sair`, `quit` ou
//! `exit` encerram.

use std::io::{BufRead, Write};

use anyhow::Result;

use crate::error::ChatError;
use crate::orchestrator::{DialogueState, Orchestrator, Turn};

const EXIT_COMMANDS: &[&str] = &["sair", "quit", "exit"];

/// Laço de conversa; o estado de diálogo vive só durante o laço.
pub fn run<R: BufRead, W: Write>(orchestrator: &Orchestrator, input: R, mut output: W) -> Result<()> {
    writeln!(output, "🍕 Atendente da pizzaria. Digite 'sair' para encerrar.")?;
    let mut state = DialogueState::Idle;

    for line in input.lines() {
        let line = line?;
        if EXIT_COMMANDS.contains(&line.trim().to_lowercase().as_str()) {
            writeln!(output, "Até logo!")?;
            break;
        }

        match orchestrator.process(&line, state) {
            Ok(turn) => {
                write_turn(&mut output, &turn)?;
                state = turn.state;
            }
            Err(ChatError::EmptyMessage) => continue,
            Err(e) => writeln!(output, "Erro: {}", e)?,
        }
        output.flush()?;
    }
    Ok(())
}

fn write_turn<W: Write>(output: &mut W, turn: &Turn) -> Result<()> {
    for result in &turn.results {
        writeln!(output, "Frase: {}", result.sentence)?;
        writeln!(output, "Intenção: {}", result.intent)?;
        writeln!(output, "Confiança: {:.2}%", result.confidence)?;
        writeln!(output, "Resposta: {}", result.response)?;
        writeln!(output)?;
    }
    Ok(())
}
