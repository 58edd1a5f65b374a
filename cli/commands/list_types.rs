use anyhow::Result;
use code2md_core::{ProjectType, get_project_types};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

pub fn handle_list_types_command() -> Result<()> {
    println!();
    println!("{}", " Available project types ".green().bold().underline());
    println!("{}", build_types_table(get_project_types().iter()));
    println!();
    Ok(())
}

fn build_types_table<'a>(types: impl Iterator<Item = (&'a String, &'a ProjectType)>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Type").fg(Color::Green),
        Cell::new("Description").fg(Color::Green),
        Cell::new("Extensions").fg(Color::Green),
    ]);
    for (name, project_type) in types {
        table.add_row(vec![
            Cell::new(name).fg(Color::Cyan),
            Cell::new(&project_type.description),
            Cell::new(project_type.extensions.join(", ")).fg(Color::DarkGrey),
        ]);
    }
    table
}
