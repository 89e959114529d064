use four_d_are_core::demo_scenarios;

pub fn run() -> anyhow::Result<()> {
    println!("Available demo scenarios:\n");
    for scenario in demo_scenarios() {
        println!("  {:<24} {}", scenario.id, scenario.name);
        println!("  {:<24} {}", "", scenario.description);
        println!("  {:<24} preset: {}\n", "", scenario.preset);
    }
    println!("Use: four-d-are analyze \"<question>\" --scenario <id>");
    Ok(())
}
