use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use crate::chat::{Session, run_turn, select_model};
use crate::core::AppConfig;
use crate::groq::{DynCompletionClient, GroqClient};

pub async fn run(model: Option<String>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    let config = AppConfig::default();
    let client = GroqClient::from_config(&config);
    let model = select_model(&config.models, model.as_deref())?;
    println!("Elegiste el modelo: {}", model);

    let mut session = Session::new(&Uuid::new_v4().to_string());

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                if line.trim() == "/clear" {
                    session.clear();
                    println!("Chat limpio.");
                    continue;
                }

                let completion = run_turn(
                    &mut session,
                    client.as_ref().map(|c| c as &DynCompletionClient),
                    model,
                    &line,
                )
                .await?;
                if let Some(notice) = &completion.notice {
                    eprintln!("{}", notice);
                }
                println!("{}", completion.content);
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
