use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::shared::serde_helpers::string_or_number;

// ============================================================================
// Category
// ============================================================================

/// Hardware component kind. The category decides which attribute bag a
/// product carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Cpu,
    Gpu,
    Motherboard,
    Ram,
    Storage,
    Psu,
    Case,
    Cooler,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 8] = [
        ProductCategory::Cpu,
        ProductCategory::Gpu,
        ProductCategory::Motherboard,
        ProductCategory::Ram,
        ProductCategory::Storage,
        ProductCategory::Psu,
        ProductCategory::Case,
        ProductCategory::Cooler,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ProductCategory::Cpu => "cpu",
            ProductCategory::Gpu => "gpu",
            ProductCategory::Motherboard => "motherboard",
            ProductCategory::Ram => "ram",
            ProductCategory::Storage => "storage",
            ProductCategory::Psu => "psu",
            ProductCategory::Case => "case",
            ProductCategory::Cooler => "cooler",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProductCategory::Cpu => "Processor",
            ProductCategory::Gpu => "Graphics card",
            ProductCategory::Motherboard => "Motherboard",
            ProductCategory::Ram => "Memory",
            ProductCategory::Storage => "Storage",
            ProductCategory::Psu => "Power supply",
            ProductCategory::Case => "Case",
            ProductCategory::Cooler => "Cooler",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

// ============================================================================
// Typed attribute bags
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSpecs {
    pub cores: u32,
    pub threads: u32,
    #[serde(rename = "baseClockGhz")]
    pub base_clock_ghz: f64,
    pub socket: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuSpecs {
    #[serde(rename = "memoryGb")]
    pub memory_gb: u32,
    pub chipset: String,
    #[serde(rename = "boostClockMhz", default)]
    pub boost_clock_mhz: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotherboardSpecs {
    pub socket: String,
    pub chipset: String,
    #[serde(rename = "formFactor")]
    pub form_factor: String,
    #[serde(rename = "memorySlots")]
    pub memory_slots: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamSpecs {
    #[serde(rename = "capacityGb")]
    pub capacity_gb: u32,
    #[serde(rename = "speedMhz")]
    pub speed_mhz: u32,
    #[serde(rename = "memoryType")]
    pub memory_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSpecs {
    #[serde(rename = "capacityGb")]
    pub capacity_gb: u32,
    #[serde(rename = "driveType")]
    pub drive_type: String,
    pub interface: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsuSpecs {
    pub wattage: u32,
    #[serde(default)]
    pub efficiency: Option<String>,
    #[serde(default)]
    pub modular: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSpecs {
    #[serde(rename = "formFactor")]
    pub form_factor: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolerSpecs {
    #[serde(rename = "coolerType")]
    pub cooler_type: String,
    #[serde(rename = "fanSizeMm", default)]
    pub fan_size_mm: Option<u32>,
}

/// Typed view of a product's attribute bag
#[derive(Debug, Clone, PartialEq)]
pub enum ProductSpecs {
    Cpu(CpuSpecs),
    Gpu(GpuSpecs),
    Motherboard(MotherboardSpecs),
    Ram(RamSpecs),
    Storage(StorageSpecs),
    Psu(PsuSpecs),
    Case(CaseSpecs),
    Cooler(CoolerSpecs),
}

impl ProductSpecs {
    pub fn category(&self) -> ProductCategory {
        match self {
            ProductSpecs::Cpu(_) => ProductCategory::Cpu,
            ProductSpecs::Gpu(_) => ProductCategory::Gpu,
            ProductSpecs::Motherboard(_) => ProductCategory::Motherboard,
            ProductSpecs::Ram(_) => ProductCategory::Ram,
            ProductSpecs::Storage(_) => ProductCategory::Storage,
            ProductSpecs::Psu(_) => ProductCategory::Psu,
            ProductSpecs::Case(_) => ProductCategory::Case,
            ProductSpecs::Cooler(_) => ProductCategory::Cooler,
        }
    }

    /// Decode an attribute bag according to the category tag
    pub fn decode(category: ProductCategory, bag: &Map<String, Value>) -> Result<Self, String> {
        let value = Value::Object(bag.clone());
        let specs = match category {
            ProductCategory::Cpu => serde_json::from_value(value).map(ProductSpecs::Cpu),
            ProductCategory::Gpu => serde_json::from_value(value).map(ProductSpecs::Gpu),
            ProductCategory::Motherboard => {
                serde_json::from_value(value).map(ProductSpecs::Motherboard)
            }
            ProductCategory::Ram => serde_json::from_value(value).map(ProductSpecs::Ram),
            ProductCategory::Storage => serde_json::from_value(value).map(ProductSpecs::Storage),
            ProductCategory::Psu => serde_json::from_value(value).map(ProductSpecs::Psu),
            ProductCategory::Case => serde_json::from_value(value).map(ProductSpecs::Case),
            ProductCategory::Cooler => serde_json::from_value(value).map(ProductSpecs::Cooler),
        };
        specs.map_err(|e| {
            format!(
                "Attributes do not match category '{}': {}",
                category.code(),
                e
            )
        })
    }

    /// Encode back into a loose attribute bag
    pub fn encode(&self) -> Map<String, Value> {
        let value = match self {
            ProductSpecs::Cpu(s) => serde_json::to_value(s),
            ProductSpecs::Gpu(s) => serde_json::to_value(s),
            ProductSpecs::Motherboard(s) => serde_json::to_value(s),
            ProductSpecs::Ram(s) => serde_json::to_value(s),
            ProductSpecs::Storage(s) => serde_json::to_value(s),
            ProductSpecs::Psu(s) => serde_json::to_value(s),
            ProductSpecs::Case(s) => serde_json::to_value(s),
            ProductSpecs::Cooler(s) => serde_json::to_value(s),
        };
        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

// ============================================================================
// Aggregate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub category: ProductCategory,
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Product {
    pub fn specs(&self) -> Result<ProductSpecs, String> {
        ProductSpecs::decode(self.category, &self.attributes)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.to_dto().validate()
    }

    pub fn to_dto(&self) -> ProductDto {
        ProductDto {
            name: self.name.clone(),
            manufacturer: self.manufacturer.clone(),
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            image: self.image.clone(),
            attributes: self.attributes.clone(),
        }
    }

    /// Case-insensitive match against name and manufacturer
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.manufacturer.to_lowercase().contains(&query)
    }
}

/// Body for `POST /products` and full edits via `PATCH /products/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDto {
    pub name: String,
    pub manufacturer: String,
    pub category: ProductCategory,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl ProductDto {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name must not be empty".into());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Price must be a non-negative number".into());
        }
        ProductSpecs::decode(self.category, &self.attributes)?;
        Ok(())
    }
}

/// Body for `PATCH /products/:id` when only the price changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdateDto {
    pub price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cpu_product() -> Product {
        serde_json::from_value(json!({
            "id": "p1",
            "name": "Ryzen 7 7700X",
            "manufacturer": "AMD",
            "category": "cpu",
            "price": 299.99,
            "quantity": 12,
            "attributes": {
                "cores": 8,
                "threads": 16,
                "baseClockGhz": 4.5,
                "socket": "AM5"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_category_codes() {
        assert_eq!(ProductCategory::ALL.len(), 8);
        for category in ProductCategory::ALL {
            assert_eq!(ProductCategory::from_code(category.code()), Some(category));
        }
        assert_eq!(ProductCategory::from_code("monitor"), None);
    }

    #[test]
    fn test_decode_specs_by_category() {
        let product = cpu_product();
        match product.specs().unwrap() {
            ProductSpecs::Cpu(specs) => {
                assert_eq!(specs.cores, 8);
                assert_eq!(specs.socket, "AM5");
            }
            other => panic!("unexpected specs: {:?}", other),
        }
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_mismatched_bag_is_rejected() {
        let mut product = cpu_product();
        product.category = ProductCategory::Ram;
        let err = product.specs().unwrap_err();
        assert!(err.contains("'ram'"));
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let mut product = cpu_product();
        product.price = -1.0;
        assert!(product.validate().is_err());
        product.price = f64::NAN;
        assert!(product.validate().is_err());
    }

    #[test]
    fn test_encode_keeps_wire_names() {
        let specs = ProductSpecs::Ram(RamSpecs {
            capacity_gb: 32,
            speed_mhz: 6000,
            memory_type: "DDR5".into(),
        });
        let bag = specs.encode();
        assert_eq!(bag.get("capacityGb"), Some(&json!(32)));
        assert_eq!(ProductSpecs::decode(ProductCategory::Ram, &bag).unwrap(), specs);
    }

    #[test]
    fn test_matches_query() {
        let product = cpu_product();
        assert!(product.matches_query("ryzen"));
        assert!(product.matches_query(" amd "));
        assert!(product.matches_query(""));
        assert!(!product.matches_query("intel"));
    }

    #[test]
    fn test_product_list_with_numeric_ids() {
        let products: Vec<Product> = serde_json::from_value(json!([
            { "id": 1, "name": "X", "manufacturer": "A", "category": "cpu", "price": 100.0, "quantity": 1 },
            { "id": "2", "name": "Y", "manufacturer": "B", "category": "gpu", "price": 50.0, "quantity": 3 }
        ]))
        .unwrap();
        assert_eq!(products[0].id, "1");
        assert_eq!(products[1].id, "2");
    }
}
