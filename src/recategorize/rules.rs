//! The six master categories and how products are assigned to them

pub struct CategoryRule {
    pub id: &'static str,
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Master categories in output order. Index 0 doubles as the catch-all.
pub const CATEGORY_RULES: [CategoryRule; 6] = [
    CategoryRule {
        id: "cat_001",
        name: "Medical & Healthcare",
        keywords: &[
            "medical", "diagnostic", "medicine", "pharma", "pharmaceutical", "skincare",
            "vitamin", "supplement", "syringe", "consumable", "dental", "ear", "oral",
            "smart health", "hot & cold", "education", "model", "safety", "sharp", "needle",
            "sanitizer", "hospital", "clinic", "analysis", "test strip", "healthcare", "biopsy",
            "nebulizer", "bp", "blood", "pulse", "monitor", "sterilizer", "wellness", "cream",
            "topical", "ointment", "dermal", "antacid", "drop", "lotion", "tablet", "promotional",
            "promo", "representative", "medical box", "branding", "disposal", "therapy",
            "hearing", "analgesic", "eye", "diagnosis", "mask", "inhaler", "disinfectant",
            "scalp", "homeo", "homeopathy", "allopathy", "allopathic",
        ],
    },
    CategoryRule {
        id: "cat_002",
        name: "Beauty, Personal Care & Wellness",
        keywords: &[
            "beauty", "personal care", "wellness", "hair", "skin", "care", "groom", "microneedl",
            "massage", "therapy", "body", "face", "roller", "makeup", "cosmetic", "aromatherapy",
            "diffuser", "fragrance", "perfume", "humidifier", "serum", "spa", "laser", "patch",
            "pillow", "hydrating", "hydration", "brush", "comb", "derma", "sun", "sunscreen",
        ],
    },
    CategoryRule {
        id: "cat_003",
        name: "Home, Kitchen & Lifestyle",
        keywords: &[
            "home", "kitchen", "storage", "organizer", "decor", "clock", "lock", "desk", "lamp",
            "tableware", "mug", "bottle", "box", "cleaning", "drinkware", "container", "utility",
            "lighting", "light", "appliance", "fragrance", "gift", "air freshener", "shoe",
            "bath", "laundry", "infuser", "stand", "shelf", "board", "tidy", "spice", "masala",
            "holder", "message board",
        ],
    },
    CategoryRule {
        id: "cat_004",
        name: "Electronics & Gadgets",
        keywords: &[
            "electronic", "computer", "microscope", "portable fan", "uv", "digital timer",
            "doorbell", "usb", "fan", "gadget", "tech", "device", "timer", "wearable", "wireless",
            "charging", "touch", "sensor", "speaker", "bluetooth", "smart", "display", "desktop",
            "remote", "multimedia", "aqi", "pump", "camera", "monitor",
        ],
    },
    CategoryRule {
        id: "cat_005",
        name: "Automotive, Tools & Industrial",
        keywords: &[
            "automotive", "car", "vehicle", "auto", "tool", "hardware", "pressure washer",
            "attachment", "magnifying", "industrial", "lab", "pump", "mannequin", "organizer",
            "mirror", "torch", "hammer", "security", "blade", "powder", "submersible", "cutter",
        ],
    },
    CategoryRule {
        id: "cat_006",
        name: "Kids, Education, Art & Gifts",
        keywords: &[
            "stem", "kid", "children", "educat", "model", "art", "gift", "toy", "3d print",
            "learning", "creative", "science", "puzzle", "anatomy", "glassware", "frame",
            "themed", "diy", "school", "student",
        ],
    },
];

/// Original category names that map straight to a master category index.
const ORIGINAL_CATEGORY_MAP: &[(&str, usize)] = &[
    ("Medical Devices", 0),
    ("Healthcare", 0),
    ("Medical Supplies", 0),
    ("Medical Consumables", 0),
    ("Medical & Diagnostics", 0),
    ("Medical & Personal Care", 0),
    ("Medicines & Pharma", 0),
    ("Medical Education Models", 0),
    ("Pharmaceuticals", 0),
    ("Beauty & Personal Care", 1),
    ("Beauty Devices", 1),
    ("Beauty Tools", 1),
    ("Home & Kitchen", 2),
    ("Home Appliances", 2),
    ("Home & Decor", 2),
    ("Home & Office Utilities", 2),
    ("Home Storage", 2),
    ("Lighting & Portable Lamps", 2),
    ("Kitchen & Home", 2),
    ("Electronics", 3),
    ("Electronics & Gadgets", 3),
    ("Electronics & Home Gadgets", 3),
    ("Electronics & Wearables", 3),
    ("Automotive Accessories", 4),
    ("Tools & Hardware", 4),
    ("Tools & Electronics", 4),
    ("Industrial & Lab Supplies", 4),
    ("Kids & Education", 5),
    ("Gifts & Drinkware", 5),
    ("Educational Aids", 5),
    ("3D Printed Art & Decor", 5),
    ("Toys & Education", 5),
    ("Creative", 5),
];

/// Index into [`CATEGORY_RULES`] for one product.
///
/// The original category name is looked up first. Otherwise the first rule
/// (in rule order, then keyword order) with a keyword occurring anywhere in
/// the lowercased `name title description` text wins; no match means 0.
/// Keywords are plain substrings, so `"ear"` also matches `"wearable"`.
#[must_use]
pub fn guess_category(original_category: &str, name: &str, title: &str, description: &str) -> usize {
    if let Some(&(_, idx)) = ORIGINAL_CATEGORY_MAP
        .iter()
        .find(|(original, _)| *original == original_category)
    {
        return idx;
    }

    let blob = format!("{name} {title} {description}").to_lowercase();
    CATEGORY_RULES
        .iter()
        .position(|rule| rule.keywords.iter().any(|kw| blob.contains(kw)))
        .unwrap_or(0)
}
