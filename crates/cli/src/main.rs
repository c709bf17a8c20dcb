mod persistence;

use persistence::{FileStore, MemoryStore, StateStore};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use yomiage_core::{
    Command, Outcome, ReadingCard, RngState, SelectionError, Session, SessionView, SymbolSide,
};
use yomiage_data::{builtin_catalog, initial_characters, load_catalog, symbol_row};

struct CliOptions {
    cards: Option<PathBuf>,
    state_dir: Option<PathBuf>,
    seed: Option<u64>,
}

fn parse_options() -> CliOptions {
    let mut options = CliOptions {
        cards: None,
        state_dir: None,
        seed: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--cards" => match args.next() {
                Some(path) => options.cards = Some(PathBuf::from(path)),
                None => fail_usage("--cards needs a path"),
            },
            "--state-dir" => match args.next() {
                Some(path) => options.state_dir = Some(PathBuf::from(path)),
                None => fail_usage("--state-dir needs a path"),
            },
            "--seed" => match args.next().and_then(|value| value.parse().ok()) {
                Some(seed) => options.seed = Some(seed),
                None => fail_usage("--seed needs an integer"),
            },
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => fail_usage(&format!("unknown option {other}")),
        }
    }
    options
}

fn fail_usage(message: &str) -> ! {
    eprintln!("yomiage: {message}");
    print_usage();
    process::exit(2)
}

fn print_usage() {
    println!("usage: yomiage [--cards PATH] [--state-dir PATH] [--seed N]");
}

fn main() {
    env_logger::init();
    let options = parse_options();

    let catalog = match &options.cards {
        Some(path) => load_catalog(path),
        None => builtin_catalog(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("yomiage: failed to load card data: {err:#}");
            process::exit(2);
        }
    };

    let mut store: Box<dyn StateStore> = match options.state_dir.clone().or_else(FileStore::default_dir)
    {
        Some(dir) => Box::new(FileStore::new(dir)),
        None => {
            log::warn!("no state directory available, progress will not survive this session");
            Box::new(MemoryStore::default())
        }
    };

    let rng = match options.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::from_entropy(),
    };
    let mut session = Session::new(catalog, rng);

    match persistence::load(store.as_mut(), session.catalog()) {
        Some(snapshot) => session.restore(snapshot),
        None => {
            persistence::clear(store.as_mut());
            session.reset_to_default();
            persistence::save(store.as_mut(), &session.snapshot());
        }
    }

    render_pair(&session.view());
    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                eprintln!("yomiage: input error: {err}");
                break;
            }
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        match tokens[0] {
            "quit" | "exit" | "q" => break,
            "help" | "?" => print_help(),
            "show" | "s" => render_pair(&session.view()),
            "status" => print_status(&session),
            "list" | "ls" => print_list(&session.view()),
            "view" => match serde_json::to_string_pretty(&session.view()) {
                Ok(body) => println!("{body}"),
                Err(err) => eprintln!("yomiage: view failed: {err}"),
            },
            "symbols" if tokens.len() == 1 => print_symbol_rows(),
            "initials" if tokens.len() == 1 => print_initials(&session),
            _ => match parse_command(&tokens) {
                Ok(command) => run_command(&mut session, store.as_mut(), command),
                Err(message) => println!("?? {message}"),
            },
        }
    }
}

fn parse_command(tokens: &[&str]) -> Result<Command, String> {
    match tokens[0] {
        "next" | "n" => Ok(Command::Advance),
        "prev" | "p" => Ok(Command::Retreat),
        "shuffle" => Ok(Command::Shuffle),
        "open" => Ok(Command::OpenDraft),
        "cancel" => Ok(Command::CancelDraft),
        "apply" => Ok(Command::CommitSettings),
        "all" => Ok(Command::SelectAll),
        "none" => Ok(Command::SelectNone),
        "toggle" | "t" => {
            let no = tokens
                .get(1)
                .and_then(|value| value.parse().ok())
                .ok_or("toggle needs a card number")?;
            Ok(Command::Toggle(no))
        }
        "random" | "r" => {
            let count = tokens
                .get(1)
                .and_then(|value| value.parse().ok())
                .ok_or("random needs a count")?;
            Ok(Command::AugmentRandomly(count))
        }
        "symbols" => {
            let side = tokens
                .get(1)
                .and_then(|value| SymbolSide::parse(value))
                .ok_or_else(|| SelectionError::NoSideChosen.to_string())?;
            let symbols: Vec<char> = tokens[2..]
                .iter()
                .filter_map(|token| token.chars().next())
                .collect();
            Ok(Command::FilterBySymbols { side, symbols })
        }
        "initials" | "i" => {
            let initials: Vec<char> = tokens[1..]
                .iter()
                .filter_map(|token| token.chars().next())
                .collect();
            Ok(Command::FilterByInitials(initials))
        }
        other => Err(format!("unknown command {other} (try help)")),
    }
}

fn run_command(session: &mut Session, store: &mut dyn StateStore, command: Command) {
    let moves_cursor = matches!(command, Command::Advance | Command::Retreat);
    match session.apply(command) {
        Ok(Outcome::Applied) => {
            persistence::save(store, &session.snapshot());
            if moves_cursor {
                render_pair(&session.view());
            } else {
                print_status(session);
            }
        }
        Ok(Outcome::Noop) => println!("(nothing to do)"),
        Ok(Outcome::Augmented(augmented)) => {
            persistence::save(store, &session.snapshot());
            if augmented.is_partial() {
                println!(
                    "note: only {} of {} cards could be added",
                    augmented.added, augmented.requested
                );
            } else {
                println!("added {} cards", augmented.added);
            }
            print_status(session);
        }
        Err(err) => println!("!! {err}"),
    }
}

fn render_face(label: &str, card: Option<&ReadingCard>) {
    match card {
        Some(card) => {
            let marker = if card.manual { " [random]" } else { "" };
            println!("{label}: {}{marker}", strip_tags(&card.shimonoku));
        }
        None => println!("{label}: -"),
    }
}

/// The faces carry the `<span class='num'>` markup the browser shell
/// renders; strip it for the terminal.
fn strip_tags(face: &str) -> String {
    let mut out = String::with_capacity(face.len());
    let mut in_tag = false;
    for ch in face.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn render_pair(view: &SessionView) {
    render_face("now ", view.current.as_ref());
    match view.lookahead.as_ref() {
        Some(card) => {
            let marker = if card.manual { " [random]" } else { "" };
            println!("next: {}{marker}", strip_tags(&card.kaminoku));
        }
        None => println!("next: -"),
    }
}

fn print_status(session: &Session) {
    let view = session.view();
    if view.draft_open {
        println!(
            "editing: {} selected ({} in play)",
            view.selected_count, view.playable_count
        );
    } else {
        println!(
            "{} in play, position {}",
            view.playable_count,
            session.cursor_index()
        );
    }
}

fn print_list(view: &SessionView) {
    for row in &view.cards {
        let mark = if row.selected { '*' } else { ' ' };
        let manual = if row.manual { " 空" } else { "" };
        println!("{mark} {:>3} {}{manual}", row.no, row.kimariji);
    }
}

fn print_symbol_rows() {
    for side in [SymbolSide::Left, SymbolSide::Center, SymbolSide::Right] {
        let row: String = symbol_row(side).iter().collect();
        println!("{:<6} {row}", side.code());
    }
}

fn print_initials(session: &Session) {
    let initials: String = initial_characters(session.catalog())
        .into_iter()
        .collect();
    println!("{initials}");
}

fn print_help() {
    println!("reading   next prev shuffle show status");
    println!("settings  open all none toggle N random N apply cancel");
    println!("filters   symbols SIDE C C C C C | initials C [C ...]");
    println!("info      list view symbols initials help quit");
}
