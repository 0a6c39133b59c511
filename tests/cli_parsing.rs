use clap::Parser;
use osint_swarm::cli::commands::memory::MemoryCommands;
use osint_swarm::cli::{Cli, Commands};

#[test]
fn test_parse_investigate_with_flags() {
    let cli = Cli::try_parse_from([
        "osint-swarm",
        "investigate",
        "example_handle_42",
        "--profile",
        "osint",
        "--auto-accept",
        "--no-memory",
        "--no-planning",
        "--output-dir",
        "/tmp/reports",
        "--json",
    ])
    .unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Investigate(args) => {
            assert_eq!(args.target.as_deref(), Some("example_handle_42"));
            assert_eq!(args.profile.as_deref(), Some("osint"));
            assert!(args.auto_accept);
            assert_eq!(args.memory_override(), Some(false));
            assert!(args.no_planning);
            assert_eq!(
                args.output_dir.as_deref(),
                Some(std::path::Path::new("/tmp/reports"))
            );
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_investigate_defaults() {
    let cli = Cli::try_parse_from(["osint-swarm", "investigate"]).unwrap();

    assert!(!cli.json);
    assert!(!cli.verbose);
    match cli.command {
        Commands::Investigate(args) => {
            assert!(args.target.is_none());
            assert!(args.profile.is_none());
            assert!(!args.auto_accept);
            assert_eq!(args.memory_override(), None);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_memory_flags_conflict() {
    let result = Cli::try_parse_from(["osint-swarm", "investigate", "alice", "--memory", "--no-memory"]);
    assert!(result.is_err());
}

#[test]
fn test_unknown_profile_rejected() {
    let result = Cli::try_parse_from(["osint-swarm", "plan", "alice", "--profile", "corporate"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_plan() {
    let cli = Cli::try_parse_from(["osint-swarm", "plan", "user@example.com", "-p", "darknet"]).unwrap();

    match cli.command {
        Commands::Plan(args) => {
            assert_eq!(args.target, "user@example.com");
            assert_eq!(args.profile.as_deref(), Some("darknet"));
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_memory_subcommands() {
    let cli = Cli::try_parse_from([
        "osint-swarm",
        "memory",
        "list",
        "darknet_20240305_070809_1a2b3c4d",
    ])
    .unwrap();
    match cli.command {
        Commands::Memory(args) => match args.command {
            MemoryCommands::List { investigation_id } => {
                assert_eq!(investigation_id, "darknet_20240305_070809_1a2b3c4d");
            }
            MemoryCommands::Recall { .. } => panic!("Wrong memory command"),
        },
        _ => panic!("Wrong top-level command"),
    }

    let cli = Cli::try_parse_from(["osint-swarm", "memory", "recall", "alice", "--limit", "3"]).unwrap();
    match cli.command {
        Commands::Memory(args) => match args.command {
            MemoryCommands::Recall { target, limit } => {
                assert_eq!(target, "alice");
                assert_eq!(limit, 3);
            }
            MemoryCommands::List { .. } => panic!("Wrong memory command"),
        },
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_init_and_global_flags() {
    let cli = Cli::try_parse_from([
        "osint-swarm",
        "--verbose",
        "--config",
        "custom.yaml",
        "init",
        "--force",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("custom.yaml")));
    match cli.command {
        Commands::Init(args) => assert!(args.force),
        _ => panic!("Wrong top-level command"),
    }
}
