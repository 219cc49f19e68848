use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Category, NewsItem, Product, Service};

const PEXELS: &str = "https://images.pexels.com";
const PEXELS_QUERY: &str = "?auto=compress&cs=tinysrgb&w=500";

/// Where a product image lives on the stock photo CDN
#[derive(Clone, Copy)]
enum Photo {
    /// A numbered photo under the standard `photos/N/pexels-photo-N.jpeg` path
    Id(u32),
    Path(&'static str),
}

impl Photo {
    fn url(self) -> String {
        match self {
            Photo::Id(id) => format!("{PEXELS}/photos/{id}/pexels-photo-{id}.jpeg{PEXELS_QUERY}"),
            Photo::Path(path) => format!("{PEXELS}/{path}{PEXELS_QUERY}"),
        }
    }
}

struct ProductRecord {
    name: &'static str,
    description: &'static str,
    price: u32,
    category: Category,
    stock: u32,
    photo: Photo,
}

struct NewsRecord {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    date: (i32, u32, u32),
    author: &'static str,
}

const SERVICES: &[(&str, &str, &str)] = &[
    (
        "Home Delivery",
        "truck",
        "Fast and reliable delivery of essential products directly to your doorstep in rural areas.",
    ),
    (
        "Healthcare Support",
        "heart",
        "Access to medicines, health consultations, and medical supplies for rural communities.",
    ),
    (
        "Quality Assurance",
        "shield",
        "All products are quality-checked and guaranteed to meet safety standards.",
    ),
    (
        "24/7 Support",
        "clock",
        "Round-the-clock customer support to help with your orders and inquiries.",
    ),
    (
        "Community Connect",
        "users",
        "Connecting rural communities with local businesses and service providers.",
    ),
    (
        "Bulk Orders",
        "package",
        "Special pricing and arrangements for bulk orders for communities and groups.",
    ),
];

const PRODUCTS: &[ProductRecord] = &[
    // Groceries
    ProductRecord {
        name: "Premium Basmati Rice (5kg)",
        description: "Premium quality aged basmati rice, perfect for daily meals and special occasions.",
        price: 450,
        category: Category::Groceries,
        stock: 100,
        photo: Photo::Path("photos/33239/rice-grain-seed-food.jpg"),
    },
    ProductRecord {
        name: "Whole Wheat Flour (10kg)",
        description: "Fresh ground whole wheat flour for making nutritious rotis and bread.",
        price: 380,
        category: Category::Groceries,
        stock: 80,
        photo: Photo::Id(4198018),
    },
    ProductRecord {
        name: "Cold Pressed Sunflower Oil (1L)",
        description: "Pure cold-pressed sunflower oil for healthy cooking and better nutrition.",
        price: 120,
        category: Category::Groceries,
        stock: 150,
        photo: Photo::Path("photos/33783/olive-oil-salad-dressing-cooking-olive.jpg"),
    },
    ProductRecord {
        name: "Organic Jaggery (1kg)",
        description: "Pure organic jaggery, a healthy alternative to refined sugar.",
        price: 85,
        category: Category::Groceries,
        stock: 200,
        photo: Photo::Id(4110251),
    },
    ProductRecord {
        name: "Premium Tea Leaves (250g)",
        description: "Hand-picked premium tea leaves from hill stations for the perfect cup.",
        price: 95,
        category: Category::Groceries,
        stock: 120,
        photo: Photo::Id(1638280),
    },
    ProductRecord {
        name: "Fresh Red Onions (2kg)",
        description: "Fresh red onions sourced directly from local farms, rich in flavor.",
        price: 60,
        category: Category::Groceries,
        stock: 90,
        photo: Photo::Path("photos/144248/onions-food-vegetables-healthy-144248.jpeg"),
    },
    ProductRecord {
        name: "Organic Turmeric Powder (200g)",
        description: "Pure organic turmeric powder with high curcumin content for health benefits.",
        price: 75,
        category: Category::Groceries,
        stock: 110,
        photo: Photo::Id(4198019),
    },
    ProductRecord {
        name: "Mixed Dal Combo (1kg)",
        description: "Nutritious mix of different lentils for protein-rich meals.",
        price: 140,
        category: Category::Groceries,
        stock: 85,
        photo: Photo::Id(4198017),
    },
    // Medicines
    ProductRecord {
        name: "Paracetamol Tablets (Strip of 10)",
        description: "Effective pain relief and fever reducer tablets for common ailments.",
        price: 25,
        category: Category::Medicines,
        stock: 300,
        photo: Photo::Id(3683074),
    },
    ProductRecord {
        name: "Antiseptic Solution (100ml)",
        description: "Medical grade antiseptic liquid for wound cleaning and disinfection.",
        price: 65,
        category: Category::Medicines,
        stock: 50,
        photo: Photo::Id(3786157),
    },
    ProductRecord {
        name: "First Aid Bandages (Pack of 10)",
        description: "Sterile medical bandages for wound care and first aid treatment.",
        price: 35,
        category: Category::Medicines,
        stock: 75,
        photo: Photo::Id(4386466),
    },
    ProductRecord {
        name: "Digital Thermometer",
        description: "Accurate digital thermometer for monitoring body temperature.",
        price: 180,
        category: Category::Medicines,
        stock: 40,
        photo: Photo::Id(4386467),
    },
    // Household
    ProductRecord {
        name: "Antibacterial Soap (Pack of 4)",
        description: "Premium antibacterial soap bars for daily hygiene and protection.",
        price: 80,
        category: Category::Household,
        stock: 100,
        photo: Photo::Id(4465831),
    },
    ProductRecord {
        name: "Eco-Friendly Detergent (1kg)",
        description: "Biodegradable detergent powder that's gentle on clothes and environment.",
        price: 150,
        category: Category::Household,
        stock: 70,
        photo: Photo::Id(4239091),
    },
    ProductRecord {
        name: "Herbal Toothpaste (100g)",
        description: "Natural herbal toothpaste for complete oral care and fresh breath.",
        price: 45,
        category: Category::Household,
        stock: 85,
        photo: Photo::Id(4465832),
    },
    ProductRecord {
        name: "Multi-Purpose Cleaner (500ml)",
        description: "All-in-one cleaner for kitchen, bathroom, and household surfaces.",
        price: 95,
        category: Category::Household,
        stock: 60,
        photo: Photo::Id(4239013),
    },
    // Electronics
    ProductRecord {
        name: "Solar LED Lantern",
        description: "Portable solar-powered LED lantern for reliable lighting in rural areas.",
        price: 450,
        category: Category::Electronics,
        stock: 30,
        photo: Photo::Id(1108572),
    },
    ProductRecord {
        name: "Power Bank (10000mAh)",
        description: "High-capacity power bank for charging mobile devices on the go.",
        price: 850,
        category: Category::Electronics,
        stock: 25,
        photo: Photo::Id(4526414),
    },
    // Agriculture
    ProductRecord {
        name: "Organic Fertilizer (5kg)",
        description: "Natural organic fertilizer to improve soil health and crop yield.",
        price: 280,
        category: Category::Agriculture,
        stock: 45,
        photo: Photo::Id(4503273),
    },
    ProductRecord {
        name: "Vegetable Seeds Combo Pack",
        description: "Variety pack of seasonal vegetable seeds for kitchen gardening.",
        price: 120,
        category: Category::Agriculture,
        stock: 55,
        photo: Photo::Id(1459339),
    },
];

const NEWS: &[NewsRecord] = &[
    NewsRecord {
        title: "New Healthcare Initiative Launched for Rural Areas",
        description: "Government announces comprehensive healthcare program to provide better medical access to rural communities across the state with mobile clinics and telemedicine services.",
        category: "health",
        date: (2024, 12, 15),
        author: "Health Ministry",
    },
    NewsRecord {
        title: "Digital Literacy Program Reaches 500+ Villages",
        description: "Rural Connect partners with local NGOs to bring digital education and technology awareness to remote villages, training over 10,000 residents in basic computer skills.",
        category: "technology",
        date: (2024, 12, 10),
        author: "RuralConnect Team",
    },
    NewsRecord {
        title: "Agricultural Subsidy Program Extended Until 2025",
        description: "Farmers can now access subsidized seeds, fertilizers, and farming equipment through our platform with enhanced government partnership and increased funding allocation.",
        category: "agriculture",
        date: (2024, 12, 8),
        author: "Agriculture Department",
    },
    NewsRecord {
        title: "Community Water Project Completed in 50 Villages",
        description: "Clean water access improved significantly with the completion of bore wells and water purification systems, benefiting over 25,000 rural residents.",
        category: "community",
        date: (2024, 12, 5),
        author: "Rural Development Authority",
    },
    NewsRecord {
        title: "Solar Energy Initiative Powers 100 Rural Schools",
        description: "Renewable energy project brings electricity to remote educational institutions, enabling digital learning and extended school hours for better education outcomes.",
        category: "technology",
        date: (2024, 12, 1),
        author: "Energy Department",
    },
    NewsRecord {
        title: "Rural Women Entrepreneurs Program Launches",
        description: "New initiative supports rural women in starting small businesses with microfinance, training, and market access through our platform.",
        category: "community",
        date: (2024, 11, 28),
        author: "Women Development Corporation",
    },
];

/// Midnight UTC on the given calendar day
fn midnight_utc((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    // Dates are literals above; an impossible date would surface as the epoch in tests
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn services() -> Vec<Service> {
    SERVICES
        .iter()
        .map(|(name, icon, description)| Service::new(*name, *description, icon))
        .collect()
}

pub fn products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(|record| {
            Product::new(
                record.name,
                record.description,
                record.price,
                record.category,
                record.stock,
                Some(record.photo.url()),
            )
        })
        .collect()
}

pub fn news() -> Vec<NewsItem> {
    NEWS.iter()
        .map(|record| {
            NewsItem::new(
                record.title,
                record.description,
                record.category,
                midnight_utc(record.date),
                record.author,
            )
        })
        .collect()
}
