use regis_core::entities::OperationLog;
use regis_core::enums::EntityType;
use regis_core::snapshot;

use crate::cli::root_commands::{SchemaArgs, SchemaShape};
use crate::output::output;

/// Handle `regis schema`.
pub fn handle(args: &SchemaArgs) -> anyhow::Result<()> {
    output(&schema_for(args.shape))
}

fn schema_for(shape: SchemaShape) -> schemars::Schema {
    match shape {
        SchemaShape::Student => snapshot::schema_for(EntityType::Student),
        SchemaShape::Module => snapshot::schema_for(EntityType::Module),
        SchemaShape::Registration => snapshot::schema_for(EntityType::Registration),
        SchemaShape::Grade => snapshot::schema_for(EntityType::Grade),
        SchemaShape::OperationLog => schemars::schema_for!(OperationLog),
    }
}
