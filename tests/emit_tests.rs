use gantt_tool::{
    ChartConfig, ConversionResult, DisplayMode, Duration, Exclusion, Schedule, Section, Task,
    TaskStatus, ValidationOptions, convert, convert_with, emit,
};

fn task_one() -> Task {
    Task::new("task1", "Task One", Duration::days(5.0)).starting("2024-01-01")
}

fn development(tasks: Vec<Task>) -> Schedule {
    let mut section = Section::new("Development");
    for task in tasks {
        section.push_task(task);
    }
    Schedule::new().with_section(section)
}

#[test]
fn scenario_single_task() {
    let text = convert(Some(&development(vec![task_one()]))).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "gantt",
            "    section Development",
            "    Task One : task1 : 2024-01-01 : 5d",
        ]
    );
    assert!(!text.ends_with('\n'));
}

#[test]
fn scenario_status_field_precedes_id() {
    let task = task_one().with_status([TaskStatus::Done]);
    let text = convert(Some(&development(vec![task]))).unwrap();
    assert!(text.contains("\n    Task One : done : task1 : 2024-01-01 : 5d"));
}

#[test]
fn multiple_status_tags_keep_their_order() {
    let task = task_one().with_status([TaskStatus::Critical, TaskStatus::Active]);
    let text = convert(Some(&development(vec![task]))).unwrap();
    assert!(text.contains("    Task One : crit, active : task1 : 2024-01-01 : 5d"));
}

#[test]
fn scenario_dependency_replaces_start() {
    let second = Task::new("task2", "Task Two", Duration::days(3.0)).after("task1");
    let text = convert(Some(&development(vec![task_one(), second]))).unwrap();
    assert!(text.ends_with("    Task Two : task2 : after task1 : 3d"));
}

#[test]
fn dependency_wins_when_start_is_also_set() {
    let second = Task::new("task2", "Task Two", "2d")
        .starting("2024-03-01")
        .after("task1");
    let text = convert(Some(&development(vec![task_one(), second]))).unwrap();
    assert!(text.contains("    Task Two : task2 : after task1 : 2d"));
    assert!(!text.contains("2024-03-01"));
}

#[test]
fn raw_durations_are_emitted_verbatim() {
    let shorthand = Task::new("a", "Shorthand", "2w").starting("2024-01-01");
    let end_date = Task::new("b", "Until", "2024-02-15").starting("2024-02-01");
    let text = convert(Some(&development(vec![shorthand, end_date]))).unwrap();
    assert!(text.contains("    Shorthand : a : 2024-01-01 : 2w"));
    assert!(text.contains("    Until : b : 2024-02-01 : 2024-02-15"));
}

#[test]
fn milestone_with_zero_duration() {
    let milestone = Task::new("launch", "Launch", Duration::days(0.0))
        .after("task1")
        .with_status([TaskStatus::Milestone]);
    let text = convert(Some(&development(vec![task_one(), milestone]))).unwrap();
    assert!(text.contains("    Launch : milestone : launch : after task1 : 0d"));
}

#[test]
fn negative_zero_milestone_emits_plain_zero() {
    let milestone = Task::new("m", "Launch", Duration::days(-0.0))
        .starting("2024-01-01")
        .with_status([TaskStatus::Milestone]);
    let text = convert(Some(&development(vec![milestone]))).unwrap();
    assert!(text.ends_with("    Launch : milestone : m : 2024-01-01 : 0d"));
    assert!(!text.contains("-0d"));

    let json = r#"{ "sections": [ { "name": "S", "tasks": [
        { "id": "m", "name": "Launch", "start": "2024-01-01",
          "status": ["milestone"], "duration": { "value": -0.0, "unit": "d" } }
    ] } ] }"#;
    let schedule: Schedule = serde_json::from_str(json).unwrap();
    let text = convert(Some(&schedule)).unwrap();
    assert!(text.ends_with("    Launch : milestone : m : 2024-01-01 : 0d"));
}

#[test]
fn scenario_empty_sections_fail() {
    let err = convert(Some(&Schedule::new())).unwrap_err();
    assert!(err.to_string().contains("at least one section"));
}

#[test]
fn scenario_duplicate_ids_fail() {
    let schedule = Schedule::new()
        .with_section(Section::new("One").with_task(Task::new("dup", "A", "1d").starting("2024-01-01")))
        .with_section(Section::new("Two").with_task(Task::new("dup", "B", "1d").starting("2024-01-02")));
    let result = ConversionResult::from(convert(Some(&schedule)));
    assert!(!result.success);
    assert!(result.text.is_none());
    assert!(result.error.unwrap().contains("Duplicate task ID"));
}

#[test]
fn missing_schedule_fails() {
    let result = ConversionResult::from(convert(None));
    assert_eq!(result, ConversionResult::failure("Gantt data is required"));
}

#[test]
fn config_directives_follow_fixed_order() {
    let mut config = ChartConfig::new()
        .with_excludes([Exclusion::Weekends, "2024-12-25".parse().unwrap()])
        .with_tick_interval("1week")
        .with_axis_format("%m/%d")
        .with_date_format("YYYY-MM-DD")
        .with_title("Release Plan");
    config.display_mode = Some(DisplayMode::Compact);
    config.enable_click = Some(true);

    let schedule = development(vec![task_one()]).with_config(config);
    let text = emit(&schedule);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "gantt",
            "    title Release Plan",
            "    dateFormat YYYY-MM-DD",
            "    axisFormat %m/%d",
            "    tickInterval 1week",
            "    excludes weekends, 2024-12-25",
            "    section Development",
            "    Task One : task1 : 2024-01-01 : 5d",
        ]
    );
    assert!(!text.contains("compact"));
    assert!(!text.contains("click"));
}

#[test]
fn unset_and_empty_settings_are_omitted() {
    let mut config = ChartConfig::new().with_title("");
    config.exclude_dates = vec![chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()];
    let schedule = development(vec![task_one()]).with_config(config);
    assert_eq!(
        emit(&schedule),
        "gantt\n    section Development\n    Task One : task1 : 2024-01-01 : 5d"
    );
}

#[test]
fn sections_and_tasks_render_in_input_order() {
    let schedule = Schedule::new()
        .with_section(
            Section::new("Zeta")
                .with_task(Task::new("z2", "Second", "1d").starting("2024-01-02"))
                .with_task(Task::new("z1", "First", "1d").starting("2024-01-01")),
        )
        .with_section(Section::new("Alpha").with_task(Task::new("a1", "Only", "1d").after("z1")));
    let text = convert(Some(&schedule)).unwrap();
    let lines: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(
        lines,
        vec![
            "    section Zeta",
            "    Second : z2 : 2024-01-02 : 1d",
            "    First : z1 : 2024-01-01 : 1d",
            "    section Alpha",
            "    Only : a1 : after z1 : 1d",
        ]
    );
}

#[test]
fn emission_is_deterministic() {
    let schedule = development(vec![
        task_one().with_status([TaskStatus::Active]),
        Task::new("task2", "Task Two", "3d").after("task1"),
    ])
    .with_config(ChartConfig::new().with_title("Plan"));
    let first = convert(Some(&schedule)).unwrap();
    let second = convert(Some(&schedule)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cycle_detection_option_flows_through_convert() {
    let schedule = development(vec![
        Task::new("a", "A", "1d").after("b"),
        Task::new("b", "B", "1d").after("a"),
    ]);
    assert!(convert(Some(&schedule)).is_ok());
    let err = convert_with(Some(&schedule), ValidationOptions::with_cycle_detection()).unwrap_err();
    assert!(err.to_string().starts_with("Dependency cycle detected"));
}

#[test]
fn conversion_result_serializes_one_side_only() {
    let ok = serde_json::to_value(ConversionResult::success("gantt")).unwrap();
    assert_eq!(ok, serde_json::json!({ "success": true, "text": "gantt" }));
    let failed = serde_json::to_value(ConversionResult::failure("boom")).unwrap();
    assert_eq!(failed, serde_json::json!({ "success": false, "error": "boom" }));
}
