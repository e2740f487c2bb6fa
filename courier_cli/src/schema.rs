use clap::ValueEnum;
use courier_optimizer::json::schema;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum SchemaKind {
    /// Input of `solve`
    #[default]
    Request,
    /// Orders, vehicles and depot used by `compare` and `sensitivity`
    Dataset,
    /// Scenario definitions used by `compare`
    Scenarios,
}

pub fn run(kind: SchemaKind) -> Result<(), anyhow::Error> {
    let schema = match kind {
        SchemaKind::Request => schema::generate_json_schema()?,
        SchemaKind::Dataset => schema::generate_dataset_schema()?,
        SchemaKind::Scenarios => schema::generate_scenario_schema()?,
    };
    println!("{schema}");

    Ok(())
}
