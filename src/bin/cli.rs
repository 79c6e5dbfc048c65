use chrono::NaiveDate;
use gantt_tool::{
    DependencyGraph, Exclusion, InputFormat, Schedule, Task, TaskDuration, TaskStatus,
    ValidationOptions, convert_files, convert_with, format_status_list, load_schedule_from_csv,
    load_schedule_from_json, validate_with,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn parse_status_csv(s: &str) -> Result<Vec<TaskStatus>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<TaskStatus>().map_err(|_| p.to_string()))
        .collect()
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Compute column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        debug_assert_eq!(row.len(), headers.len());
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (width, cell) in widths.iter().zip(cells) {
        line.push(' ');
        line.push_str(cell);
        let pad = width.saturating_sub(cell.len());
        if pad > 0 {
            line.push_str(&" ".repeat(pad));
        }
        line.push(' ');
        line.push('|');
    }
    line
}

fn render_schedule_table(schedule: &Schedule) -> String {
    let headers = ["section", "id", "name", "status", "start", "after", "duration"];
    let rows: Vec<Vec<String>> = schedule
        .tasks_with_sections()
        .map(|(section, task)| {
            let duration = match task.duration_spec() {
                Some(TaskDuration::Fixed(d)) => d.to_string(),
                Some(TaskDuration::Raw(raw)) => raw.clone(),
                None => String::new(),
            };
            vec![
                section.to_string(),
                task.id.clone(),
                task.name.clone(),
                format_status_list(&task.status),
                task.start.clone(),
                task.dependency().unwrap_or_default().to_string(),
                duration,
            ]
        })
        .collect();
    render_text_table(&headers, &rows)
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show current schedule\n  section <name...>                  Select (or create) the section new tasks go into\n  add <id> <name> <start|after:ID> <duration> [status_csv]\n                                     Upsert a task (use _ for spaces in the name)\n  delete <id>                        Delete a task\n  title <text...>                    Set the chart title\n  dateformat <fmt>                   Set the dateFormat directive\n  axisformat <fmt>                   Set the axisFormat directive\n  tick <interval>                    Set the tickInterval directive\n  excludes <csv>                     Set excludes (e.g. weekends,2024-12-25)\n  status                             List accepted status tags\n  cycles <on|off>                    Toggle dependency cycle detection\n  validate                           Validate the schedule\n  emit                               Print the gantt definition\n  deps                               Show dependency order\n  load <json|csv> <path>             Load schedule from disk\n  save <path>                        Write the gantt definition to disk\n  batch <path...>                    Convert files in parallel into <path>.mmd\n  quit|exit                          Exit"
    );
}

fn print_status_tags() {
    println!("Accepted status tags:");
    for (key, description) in TaskStatus::variants() {
        println!("  {:<12} {}", key, description);
    }
}

fn print_dependencies(schedule: &Schedule) {
    let graph = DependencyGraph::build(schedule);
    match graph.dependency_order() {
        Some(order) => {
            println!("Dependency order: {}", order.join(", "));
            for task in schedule.tasks() {
                let dependents = graph.dependents(&task.id);
                if !dependents.is_empty() {
                    println!("  {} -> {}", task.id, dependents.join(", "));
                }
            }
        }
        None => match graph.find_cycle() {
            Some(path) => println!("Dependency cycle: {}", path.join(" -> ")),
            None => println!("Dependency cycle detected."),
        },
    }
}

fn warn_if_excluded(schedule: &Schedule, task: &Task) {
    let Some(config) = &schedule.config else {
        return;
    };
    if let Ok(date) = NaiveDate::parse_from_str(&task.start, "%Y-%m-%d") {
        if config.is_excluded(date) {
            println!("Warning: start date {date} falls on an excluded day.");
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut schedule = Schedule::new();
    let mut current_section: Option<String> = None;
    let mut options = ValidationOptions::default();

    println!("Gantt Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_schedule_table(&schedule));
            }
            "status" => {
                print_status_tags();
            }
            "section" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                if name.is_empty() {
                    println!("Usage: section <name...>");
                    continue;
                }
                println!("Section '{name}' selected.");
                current_section = Some(name);
            }
            "add" => {
                let args: Vec<&str> = parts.collect();
                if args.len() < 4 {
                    println!("Usage: add <id> <name> <start|after:ID> <duration> [status_csv]");
                    continue;
                }
                let Some(section_name) = current_section.clone() else {
                    println!("No section selected. Use 'section <name>' first.");
                    continue;
                };
                let status = match args.get(4).map(|csv| parse_status_csv(csv)) {
                    Some(Ok(status)) => status,
                    Some(Err(bad)) => {
                        println!("Unknown status '{bad}'. Type 'status' for the accepted tags.");
                        continue;
                    }
                    None => Vec::new(),
                };
                let id = args[0];
                let task = Task::new(id, args[1].replace('_', " "), args[3]).with_status(status);
                let task = match args[2].strip_prefix("after:") {
                    Some(dependency) => task.after(dependency),
                    None => task.starting(args[2]),
                };
                warn_if_excluded(&schedule, &task);
                if schedule.upsert_task(&section_name, task) {
                    println!("Task {id} updated.");
                } else {
                    println!("Task {id} added to section '{section_name}'.");
                }
            }
            "delete" => match parts.next() {
                Some(id) => {
                    if schedule.delete_task(id) {
                        println!("Deleted task {id}.");
                    } else {
                        println!("Task {id} not found.");
                    }
                }
                None => println!("Usage: delete <id>"),
            },
            "title" => {
                let title = parts.collect::<Vec<_>>().join(" ");
                schedule.config_mut().title = Some(title);
                println!("Title set.");
            }
            "dateformat" | "axisformat" | "tick" => match parts.next() {
                Some(value) => {
                    let config = schedule.config_mut();
                    let slot = match cmd {
                        "dateformat" => &mut config.date_format,
                        "axisformat" => &mut config.axis_format,
                        _ => &mut config.tick_interval,
                    };
                    *slot = Some(value.to_string());
                    println!("{cmd} set.");
                }
                None => println!("Usage: {cmd} <value>"),
            },
            "excludes" => {
                let raw = parts.collect::<Vec<_>>().join(" ");
                match Exclusion::parse_list(&raw) {
                    Ok(excludes) => {
                        schedule.config_mut().excludes = excludes;
                        println!("excludes set.");
                    }
                    Err(e) => println!("Error: {e}"),
                }
            }
            "cycles" => match parts.next() {
                Some("on") => {
                    options.detect_cycles = true;
                    println!("Cycle detection enabled.");
                }
                Some("off") => {
                    options.detect_cycles = false;
                    println!("Cycle detection disabled.");
                }
                _ => println!("Usage: cycles <on|off>"),
            },
            "validate" => match validate_with(Some(&schedule), options) {
                Ok(()) => println!("Schedule is valid."),
                Err(e) => println!("Validation error: {e}"),
            },
            "emit" => match convert_with(Some(&schedule), options) {
                Ok(text) => println!("{text}"),
                Err(e) => println!("Validation error: {e}"),
            },
            "deps" => {
                print_dependencies(&schedule);
            }
            "load" => {
                let fmt_s = parts.next();
                let path = parts.next();
                match (fmt_s, path) {
                    (Some(fmt_s), Some(path)) => {
                        let loaded = match fmt_s.parse::<InputFormat>() {
                            Ok(InputFormat::Json) => load_schedule_from_json(path),
                            Ok(InputFormat::Csv) => load_schedule_from_csv(path).map(Some),
                            Err(e) => Err(e),
                        };
                        match loaded {
                            Ok(Some(loaded)) => {
                                current_section =
                                    loaded.sections.last().map(|section| section.name.clone());
                                schedule = loaded;
                                println!("Schedule loaded from {path}.");
                            }
                            Ok(None) => println!("File {path} contained no schedule."),
                            Err(e) => println!("Load error: {e}"),
                        }
                    }
                    _ => println!("Usage: load <json|csv> <path>"),
                }
            }
            "save" => match parts.next() {
                Some(path) => match convert_with(Some(&schedule), options) {
                    Ok(text) => match fs::write(path, text) {
                        Ok(()) => println!("Diagram written to {path}."),
                        Err(e) => println!("Save error: {e}"),
                    },
                    Err(e) => println!("Validation error: {e}"),
                },
                None => println!("Usage: save <path>"),
            },
            "batch" => {
                let paths: Vec<PathBuf> = parts.map(PathBuf::from).collect();
                if paths.is_empty() {
                    println!("Usage: batch <path...>");
                    continue;
                }
                for outcome in convert_files(&paths, options) {
                    let source = outcome.path.display();
                    match outcome.result {
                        Ok(text) => {
                            let target = outcome.path.with_extension("mmd");
                            match fs::write(&target, text) {
                                Ok(()) => println!("{source}: ok -> {}", target.display()),
                                Err(e) => println!("{source}: write error: {e}"),
                            }
                        }
                        Err(e) => println!("{source}: error: {e}"),
                    }
                }
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
