use foodwise_core::FoodCategory;

const COMMON_TIP: &str = "Maintain optimal humidity levels for your food type";

/// Storage recommendations for a category, most specific first.
pub fn storage_tips(category: FoodCategory) -> Vec<&'static str> {
    let specific: &[&'static str] = match category {
        FoodCategory::Fruits => &[
            "Store most fruits in the refrigerator at 0-4°C",
            "Keep bananas and tropical fruits at room temperature",
        ],
        FoodCategory::Vegetables => &[
            "Store leafy greens in the refrigerator",
            "Keep root vegetables in a cool, dark place",
        ],
        FoodCategory::Dairy => &[
            "Keep refrigerated at 2-4°C",
            "Store away from strong-smelling foods",
        ],
        FoodCategory::Meat => &[
            "Keep refrigerated at 0-2°C or frozen at -18°C",
            "Use airtight packaging to prevent cross-contamination",
        ],
        FoodCategory::Bakery => &[
            "Store bread at room temperature for short-term use",
            "Freeze bread for longer storage",
        ],
        FoodCategory::Other => &[],
    };

    specific.iter().copied().chain([COMMON_TIP]).collect()
}
