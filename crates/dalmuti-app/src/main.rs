use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use dalmuti_app::cli::{Cli, Command, HELP};
use dalmuti_app::console::{describe_step, render_results, render_table};
use dalmuti_app::logging::init_logging;
use dalmuti_app::{GameController, SharedController, TurnScheduler};
use dalmuti_core::AppInfo;
use dalmuti_core::model::player::PlayerId;
use dalmuti_core::model::trick::format_cards;

const VIEWER: PlayerId = PlayerId(0);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;
    tracing::info!(app = AppInfo::name(), version = AppInfo::version(), "starting table");

    let controller: SharedController =
        Arc::new(Mutex::new(GameController::start_game(cli.settings())?));
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    print_tax(&controller);
    loop {
        if controller.lock().computer_turn_pending() {
            if !run_computers(&controller, &cli, &mut input).await? {
                break;
            }
            continue;
        }

        let finished = controller.lock().round_finished().map(<[_]>::to_vec);
        if let Some(order) = finished {
            let snapshot = controller.lock().snapshot(VIEWER);
            println!("{}", render_results(&snapshot, &order));
            if cli.auto {
                break;
            }
            println!("'restart' to deal again, 'quit' to leave");
            match read_command(&mut input).await? {
                Some(Command::Restart) => restart(&controller, &cli)?,
                Some(Command::Quit) | None => break,
                Some(Command::Help) => println!("{HELP}"),
                Some(_) => println!("The round is over."),
            }
            continue;
        }

        print!("{}", render_table(&controller.lock().snapshot(VIEWER)));
        println!("Your turn: 'play <idx> ...', 'pass', or 'help' for more");
        let Some(command) = read_command(&mut input).await? else {
            break;
        };
        match command {
            Command::Play(indices) => {
                if let Err(err) = controller.lock().play_turn(&indices) {
                    println!("Not allowed: {err}");
                }
            }
            Command::Pass => {
                if let Err(err) = controller.lock().pass_turn() {
                    println!("Not allowed: {err}");
                }
            }
            Command::Hint => {
                let plays = controller.lock().legal_plays();
                let listed: Vec<String> = plays.iter().map(|play| format_cards(play)).collect();
                if listed.is_empty() {
                    println!("Nothing beats the pile; you can only pass.");
                } else {
                    println!("Legal: {}", listed.join(" "));
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Restart => restart(&controller, &cli)?,
            Command::Quit => break,
        }
    }
    Ok(())
}

/// Paces computer turns and prints each one. A line typed during the wait
/// interrupts the pause: `quit` returns `false`, `restart` deals again, and
/// anything else lets the caller resume the computers with a fresh delay.
async fn run_computers(
    controller: &SharedController,
    cli: &Cli,
    input: &mut Lines<BufReader<Stdin>>,
) -> Result<bool> {
    let scheduler = TurnScheduler::new(Arc::clone(controller), cli.delay());
    let snapshot = controller.lock().snapshot(VIEWER);

    if cli.auto {
        scheduler
            .run(|step| println!("{}", describe_step(&snapshot, step)))
            .await;
        return Ok(true);
    }

    tokio::select! {
        _ = scheduler.run(|step| println!("{}", describe_step(&snapshot, step))) => Ok(true),
        line = input.next_line() => {
            scheduler.cancel();
            let Some(line) = line? else {
                return Ok(false);
            };
            match Command::parse(&line) {
                Ok(Command::Quit) => Ok(false),
                Ok(Command::Restart) => {
                    restart(controller, cli)?;
                    Ok(true)
                }
                _ => {
                    println!("Wait for your turn.");
                    Ok(true)
                }
            }
        }
    }
}

async fn read_command(input: &mut Lines<BufReader<Stdin>>) -> Result<Option<Command>> {
    while let Some(line) = input.next_line().await? {
        match Command::parse(&line) {
            Ok(command) => return Ok(Some(command)),
            Err(message) => println!("{message}"),
        }
    }
    Ok(None)
}

fn restart(controller: &SharedController, cli: &Cli) -> Result<()> {
    controller.lock().restart(cli.settings())?;
    print_tax(controller);
    Ok(())
}

fn print_tax(controller: &SharedController) {
    let snapshot = controller.lock().snapshot(VIEWER);
    if let Some(tax) = &snapshot.tax {
        let name = |id: PlayerId| snapshot.players[id.index()].name.clone();
        println!(
            "Tax: {} hands {} to {}, receives {}",
            name(tax.commoner),
            format_cards(&tax.to_ruler),
            name(tax.ruler),
            format_cards(&tax.to_commoner),
        );
    }
}
