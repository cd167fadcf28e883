//! The `quizshow init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizshow.toml").exists() {
        println!("quizshow.toml already exists, skipping.");
    } else {
        std::fs::write("quizshow.toml", SAMPLE_CONFIG)?;
        println!("Created quizshow.toml");
    }

    std::fs::create_dir_all("banks")?;
    let example_path = std::path::Path::new("banks/example.txt");
    if example_path.exists() {
        println!("banks/example.txt already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/example.txt");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizshow validate --bank banks/example.txt");
    println!("  2. Run: quizshow play --bank banks/example.txt");
    println!("  3. Or play from a configured source: quizshow play --source local --name example.txt");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizshow configuration

default_source = "github"
default_bank = "CLUB ATLETICO HURACAN.txt"
audio_enabled = true

[voice]
lang = "es"
tld = "com.ar"
locale = "es"

[sources.github]
type = "github"
owner = "raul752"
repo = "TEST-PREGUNTAS"
path = "LISTAS"
branch = "main"
token = "${GITHUB_TOKEN}"

[sources.local]
type = "local"
path = "banks"
"#;

const EXAMPLE_BANK: &str = "\
1. Which planet is known as the red planet?
A. Venus
B. Mars*
C. Jupiter
D. Saturn

2. How many sides does a hexagon have?
A. Five
B. Seven
C. Six*
D. Eight

3. What is the chemical symbol for gold?
A. Au*
B. Ag
C. Gd
D. Go
";
