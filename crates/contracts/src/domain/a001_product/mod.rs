pub mod aggregate;

pub use aggregate::{
    CaseSpecs, CoolerSpecs, CpuSpecs, GpuSpecs, MotherboardSpecs, PriceUpdateDto, Product,
    ProductCategory, ProductDto, ProductSpecs, PsuSpecs, RamSpecs, StorageSpecs,
};
