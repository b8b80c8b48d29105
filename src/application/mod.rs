pub mod use_cases;

pub use use_cases::code_mapping_lookup::CodeMappingLookupUseCase;
pub use use_cases::column_projector::ColumnProjectorUseCase;
pub use use_cases::dataset_mapper::DatasetMapperUseCase;
