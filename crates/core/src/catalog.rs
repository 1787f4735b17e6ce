//! The static sample catalog.
//!
//! Products, creators and categories are fixed sample data used in place of a
//! real data store. The catalog is built once and shared read-only; nothing
//! mutates it at runtime.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{CreatorId, DiscountPercent, Price, ProductId};

/// Reference to the creator selling a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRef {
    pub name: String,
    pub handle: String,
    pub image: String,
}

/// A product listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Percentage discount, if the product is on sale.
    pub discount: Option<DiscountPercent>,
    pub images: Vec<String>,
    pub category: String,
    pub creator: CreatorRef,
    pub rating: f32,
    pub review_count: u32,
    pub trending: bool,
    pub tags: Vec<String>,
    pub description: Option<String>,
}

impl Product {
    /// Unit price after applying the product's discount.
    #[must_use]
    pub fn discounted_price(&self) -> Price {
        self.price.discounted(self.discount)
    }

    /// First image, used as the thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Follower counts per social platform, as display labels ("820K").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialCounts {
    pub instagram: String,
    pub youtube: String,
    pub tiktok: String,
}

/// A featured creator shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    pub id: CreatorId,
    pub name: String,
    pub handle: String,
    pub profile_image: String,
    pub cover_image: String,
    pub category: String,
    /// Follower count display label ("1.2M").
    pub followers: String,
    pub socials_count: SocialCounts,
    pub verified: bool,
    pub description: String,
    pub product_count: u32,
}

/// A browsable product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub slug: String,
    pub image: String,
}

/// Read-only catalog with an id index for product lookups.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    creators: Vec<Creator>,
    categories: Vec<Category>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from explicit data.
    ///
    /// If two products share an id, the first one wins.
    #[must_use]
    pub fn new(products: Vec<Product>, creators: Vec<Creator>, categories: Vec<Category>) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            by_id.entry(product.id.clone()).or_insert(idx);
        }
        Self {
            products,
            creators,
            categories,
            by_id,
        }
    }

    /// The built-in sample catalog.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(sample_products(), sample_creators(), sample_categories())
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.by_id.get(id).and_then(|&idx| self.products.get(idx))
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products flagged as trending.
    pub fn trending(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.trending)
    }

    /// Products in a category (case-insensitive name match).
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(category))
    }

    /// Products sold by the creator with the given handle.
    pub fn by_creator<'a>(&'a self, handle: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |p| p.creator.handle == handle)
    }

    /// Look up a featured creator by handle.
    #[must_use]
    pub fn creator(&self, handle: &str) -> Option<&Creator> {
        self.creators.iter().find(|c| c.handle == handle)
    }

    /// All featured creators.
    #[must_use]
    pub fn creators(&self) -> &[Creator] {
        &self.creators
    }

    /// All categories, including the catch-all "all" entry.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

// =============================================================================
// Sample Data
// =============================================================================

const PEXELS_PARAMS: &str = "?auto=compress&cs=tinysrgb&w=1600";

fn pexels(photo: u32) -> String {
    format!("https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg{PEXELS_PARAMS}")
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|&t| t.to_owned()).collect()
}

fn creator_ref(name: &str, handle: &str, photo: u32) -> CreatorRef {
    CreatorRef {
        name: name.to_owned(),
        handle: handle.to_owned(),
        image: pexels(photo),
    }
}

fn sample_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("p1"),
            name: "Minimalist Daily Planner".to_owned(),
            price: Price::usd_cents(2499),
            discount: None,
            images: vec![pexels(733_852), pexels(760_710), pexels(1_809_644)],
            category: "Lifestyle".to_owned(),
            creator: creator_ref("Emma Lewis", "emmacreates", 1_462_637),
            rating: 4.8,
            review_count: 124,
            trending: true,
            tags: tags(&["Self Made", "Promotional"]),
            description: None,
        },
        Product {
            id: ProductId::new("p2"),
            name: "Wireless Noise-Cancelling Headphones".to_owned(),
            price: Price::usd_cents(14999),
            discount: DiscountPercent::new(15).ok(),
            images: vec![pexels(3_394_650), pexels(3_394_651), pexels(3_394_652)],
            category: "Tech".to_owned(),
            creator: creator_ref("Alex Rivera", "techwithalex", 1_680_172),
            rating: 4.9,
            review_count: 302,
            trending: true,
            tags: tags(&["Resale"]),
            description: None,
        },
        Product {
            id: ProductId::new("p3"),
            name: "Sustainable Cotton Tote Bag".to_owned(),
            price: Price::usd_cents(1999),
            discount: None,
            images: vec![pexels(5_632_379), pexels(5_632_380), pexels(5_632_381)],
            category: "Fashion".to_owned(),
            creator: creator_ref("Sophia Chen", "sophiadesigns", 712_513),
            rating: 4.7,
            review_count: 89,
            trending: true,
            tags: tags(&["Self Made", "Promotional"]),
            description: None,
        },
    ]
}

fn social(instagram: &str, youtube: &str, tiktok: &str) -> SocialCounts {
    SocialCounts {
        instagram: instagram.to_owned(),
        youtube: youtube.to_owned(),
        tiktok: tiktok.to_owned(),
    }
}

fn sample_creators() -> Vec<Creator> {
    vec![
        Creator {
            id: CreatorId::new("1"),
            name: "Sophia Chen".to_owned(),
            handle: "sophiadesigns".to_owned(),
            profile_image: pexels(712_513),
            cover_image: pexels(5_632_402),
            category: "Fashion".to_owned(),
            followers: "1.2M".to_owned(),
            socials_count: social("820K", "450K", "1.2M"),
            verified: true,
            description: "Fashion designer and stylist creating sustainable, trendy pieces for the modern woman.".to_owned(),
            product_count: 28,
        },
        Creator {
            id: CreatorId::new("2"),
            name: "Alex Rivera".to_owned(),
            handle: "techwithalex".to_owned(),
            profile_image: pexels(1_680_172),
            cover_image: pexels(3_739_418),
            category: "Tech".to_owned(),
            followers: "875K".to_owned(),
            socials_count: social("340K", "875K", "590K"),
            verified: true,
            description: "Tech reviewer and gadget enthusiast bringing you honest opinions on the latest innovations.".to_owned(),
            product_count: 15,
        },
        Creator {
            id: CreatorId::new("3"),
            name: "Maya Johnson".to_owned(),
            handle: "mayafitlife".to_owned(),
            profile_image: pexels(7_148_384),
            cover_image: pexels(4_498_362),
            category: "Fitness".to_owned(),
            followers: "650K".to_owned(),
            socials_count: social("650K", "220K", "780K"),
            verified: true,
            description: "Certified personal trainer helping you achieve your fitness goals with effective workouts and nutrition tips.".to_owned(),
            product_count: 32,
        },
    ]
}

fn sample_categories() -> Vec<Category> {
    [
        ("Fashion", "fashion", 5_632_402),
        ("Fitness", "fitness", 4_498_362),
        ("Tech", "tech", 3_739_418),
        ("Beauty", "beauty", 3_785_147),
        ("Photography", "photography", 3_062_541),
        ("Business", "business", 3_184_465),
        ("Music", "music", 4_571_219),
        ("All Categories", "all", 5_632_398),
    ]
    .into_iter()
    .map(|(name, slug, photo)| Category {
        name: name.to_owned(),
        slug: slug.to_owned(),
        image: pexels(photo),
    })
    .collect()
}
