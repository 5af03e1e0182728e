use anyhow::{Context, Result};
use chrono::Utc;
use hackertracker::config::Config;
use hackertracker::context::{AppContext, SharedContext, StandardContext};
use hackertracker::day_index::ScheduleRow;
use hackertracker::resource::Resource;
use hackertracker::search::SearchItem;
use hackertracker::store::{ConferenceSource, ConferenceStore};
use hackertracker::tabs::{InfoPage, time_label};
use hackertracker::ticker::spawn_ticker;
use hackertracker::viewmodel::ConferenceViewModel;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

fn init_logging(ctx: &dyn AppContext, config: &Config) {
    let Some(path) = ctx.get_log_path() else {
        return;
    };
    match std::fs::File::create(&path) {
        Ok(file) => {
            let _ = simplelog::WriteLogger::init(
                config.log_level_filter(),
                simplelog::Config::default(),
                file,
            );
        }
        Err(e) => eprintln!("Could not open log file {}: {}", path.display(), e),
    }
}

/// A parsed command line: optional data root, command name and its arguments.
#[derive(Debug, PartialEq)]
struct Invocation {
    root: Option<PathBuf>,
    command: String,
    args: Vec<String>,
}

/// Returns `None` when there is no command to run and help should be shown.
fn parse_args(mut args: Vec<String>) -> Result<Option<Invocation>> {
    // Optional data root override: --root <dir>
    let mut root = None;
    if let Some(pos) = args.iter().position(|a| a == "--root") {
        if pos + 1 >= args.len() {
            anyhow::bail!("--root needs a directory");
        }
        root = Some(PathBuf::from(args.remove(pos + 1)));
        args.remove(pos);
    }

    if args.is_empty() || matches!(args[0].as_str(), "--help" | "-h" | "help") {
        return Ok(None);
    }
    let command = args.remove(0);
    Ok(Some(Invocation {
        root,
        command,
        args,
    }))
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(Invocation {
        root,
        command,
        args,
    }) = parse_args(env::args().skip(1).collect())?
    else {
        print_help();
        return Ok(());
    };

    let ctx: SharedContext = Arc::new(StandardContext::new(root));
    let config = Config::load_or_default(ctx.as_ref())?;
    init_logging(ctx.as_ref(), &config);

    let store = Rc::new(ConferenceStore::load(ctx.clone()).context("Failed to load dataset")?);
    if let Some(code) = &config.conference_code
        && !store.select_conference(code)
    {
        log::warn!("Configured conference '{}' not found", code);
    }
    let vm = ConferenceViewModel::new(store.clone() as Rc<dyn ConferenceSource>);

    match command.as_str() {
        "days" => print_days(&vm),
        "schedule" => print_schedule(&vm, &store, &config, &args),
        "search" => print_search(&vm, &config, &args.join(" ")),
        "bookmark" => {
            let id: i64 = args
                .first()
                .context("bookmark needs an event id")?
                .parse()
                .context("event id must be a number")?;
            let on = vm.toggle_bookmark(id)?;
            println!("Event {} {}", id, if on { "bookmarked" } else { "unbookmarked" });
            Ok(())
        }
        "info" => {
            let position: usize = args
                .first()
                .context("info needs a page index")?
                .parse()
                .context("page index must be a number")?;
            if position >= InfoPage::all().len() {
                anyhow::bail!("No information page at index {}", position);
            }
            println!("{}", InfoPage::at(position));
            Ok(())
        }
        "watch" => watch(&vm, &config).await,
        other => {
            print_help();
            anyhow::bail!("Unknown command '{}'", other)
        }
    }
}

fn print_days(vm: &ConferenceViewModel) -> Result<()> {
    let tabs = vm.day_tabs();
    if tabs.is_empty() {
        println!("No conference selected.");
    }
    for tab in tabs {
        let row = match vm.date_position(tab.day.date_naive()) {
            Some(i) => format!("row {}", i),
            None => "no events".to_string(),
        };
        println!("{:<8} {}", tab.label, row);
    }
    Ok(())
}

fn print_schedule(
    vm: &ConferenceViewModel,
    store: &ConferenceStore,
    config: &Config,
    args: &[String],
) -> Result<()> {
    let types = vm.types.get().data().cloned().unwrap_or_default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--bookmarked" => {
                if let Some(t) = types.iter().find(|t| t.is_bookmark) {
                    vm.set_type_selected(t.id, true);
                }
            }
            "--type" => {
                i += 1;
                let name = args.get(i).context("--type needs a name")?;
                let t = types
                    .iter()
                    .find(|t| !t.is_bookmark && t.name.eq_ignore_ascii_case(name))
                    .with_context(|| format!("Unknown type '{}'", name))?;
                vm.set_type_selected(t.id, true);
            }
            other => anyhow::bail!("Unknown schedule option '{}'", other),
        }
        i += 1;
    }

    match vm.schedule.get() {
        Resource::NotInitialized => println!("No conference selected."),
        Resource::Loading => println!("Loading..."),
        Resource::Error(msg) => anyhow::bail!(msg),
        Resource::Success(_) => {
            let rows = vm.schedule_rows().unwrap_or_default();
            if rows.is_empty() {
                println!("Nothing to show.");
            }
            for row in rows {
                match row {
                    ScheduleRow::Day(d) => println!("\n== {}", d.format("%A %B %-d")),
                    ScheduleRow::Time(t) => println!("  {}", time_label(t, config.use_24h_clock)),
                    ScheduleRow::Event(e) => {
                        let mark = if store.is_bookmarked(e.id) { "*" } else { " " };
                        println!(
                            "   {} [{}] {} ({}, {})",
                            mark, e.id, e.title, e.event_type.name, e.location.name
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_search(vm: &ConferenceViewModel, config: &Config, query: &str) -> Result<()> {
    vm.on_query_text_change(query);
    let results = vm.search.get();
    if results.is_empty() {
        println!("No results.");
    }
    for item in results {
        match item {
            SearchItem::Label(group) => println!("\n{}", group),
            SearchItem::Speaker(s) => println!("  {}", s.name),
            SearchItem::Location(l) => println!("  @ {}", l.name),
            SearchItem::Event(e) => println!(
                "    {} {} {}",
                e.start.format("%b %-d"),
                time_label(e.start, config.use_24h_clock),
                e.title
            ),
        }
    }
    Ok(())
}

async fn watch(vm: &ConferenceViewModel, config: &Config) -> Result<()> {
    let (mut ticks, handle) = spawn_ticker(config.tick_interval());
    loop {
        tokio::select! {
            Some(now) = ticks.recv() => {
                if !config.scroll_to_current {
                    continue;
                }
                match vm.scroll_target(now) {
                    Some(row) => println!("{} next up at row {}", now.format("%H:%M:%S"), row),
                    None => println!("{} nothing left to scroll to", now.format("%H:%M:%S")),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    drop(ticks);
    handle.abort();
    log::info!("Stopped watching at {}", Utc::now());
    Ok(())
}

fn print_help() {
    println!(
        "hackertracker v{} - conference schedule, search and bookmarks",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    hackertracker [--root <dir>] <command>");
    println!();
    println!("COMMANDS:");
    println!("    days                                  List day tabs");
    println!("    schedule [--type NAME]... [--bookmarked]");
    println!("                                          Show the filtered schedule");
    println!("    search QUERY                          Search speakers, locations and events");
    println!("    bookmark EVENT_ID                     Toggle a bookmark");
    println!("    info INDEX                            Show the information page at INDEX");
    println!("    watch                                 Print the current scroll position on every tick");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn root_without_command_shows_help() {
        assert_eq!(parse_args(args(&["--root", "/tmp/ht"])).unwrap(), None);
        assert_eq!(parse_args(args(&[])).unwrap(), None);
        assert_eq!(parse_args(args(&["--root", "/tmp/ht", "-h"])).unwrap(), None);
    }

    #[test]
    fn root_is_removed_from_command_args() {
        let parsed = parse_args(args(&["search", "--root", "/tmp/ht", "radio", "hall"]))
            .unwrap()
            .unwrap();
        assert_eq!(parsed.root, Some(PathBuf::from("/tmp/ht")));
        assert_eq!(parsed.command, "search");
        assert_eq!(parsed.args, args(&["radio", "hall"]));
    }

    #[test]
    fn root_needs_a_value() {
        let err = parse_args(args(&["days", "--root"])).unwrap_err();
        assert!(err.to_string().contains("--root needs a directory"));
    }
}
