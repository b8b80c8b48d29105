pub mod code_mapping_lookup;
pub mod column_projector;
pub mod dataset_mapper;
