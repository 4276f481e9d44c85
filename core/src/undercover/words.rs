use serde::{Deserialize, Serialize};

/// Two closely related words: most players get `common`, one player gets `undercover`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPair {
    pub common: String,
    pub undercover: String,
}

impl WordPair {
    pub fn new(common: impl Into<String>, undercover: impl Into<String>) -> Self {
        Self {
            common: common.into(),
            undercover: undercover.into(),
        }
    }
}

const BUILTIN_PAIRS: &[(&str, &str)] = &[
    ("apple", "pear"),
    ("cat", "dog"),
    ("sun", "moon"),
    ("football", "basketball"),
    ("sofa", "chair"),
    ("airplane", "train"),
    ("pencil", "pen"),
    ("table", "bed"),
    ("glasses", "sunglasses"),
    ("strawberry", "cherry"),
    ("washing machine", "dryer"),
    ("dumpling", "bun"),
    ("backpack", "handbag"),
    ("snow", "rain"),
    ("desk lamp", "chandelier"),
    ("cookie", "cake"),
    ("river", "lake"),
    ("black tea", "green tea"),
    ("chocolate", "candy"),
    ("mirror", "glass"),
    ("phone", "tablet"),
    ("park", "playground"),
    ("milk", "soy milk"),
    ("tree", "grass"),
    ("watermelon", "cantaloupe"),
    ("movie", "tv series"),
    ("fridge", "air conditioner"),
    ("elevator", "stairs"),
    ("hat", "helmet"),
    ("toothpaste", "toothbrush"),
    ("teapot", "coffee cup"),
    ("map", "compass"),
    ("socks", "gloves"),
    ("watch", "clock"),
    ("boat", "submarine"),
    ("music", "dance"),
    ("hippo", "rhino"),
    ("kite", "airplane"),
    ("hot pot", "barbecue"),
    ("book", "magazine"),
    ("grape", "blueberry"),
    ("honey", "syrup"),
    ("coffee", "milk tea"),
    ("motorcycle", "e-bike"),
    ("typhoon", "tornado"),
    ("key", "password"),
    ("pillow", "cushion"),
    ("piano", "guitar"),
    ("goat", "sheep"),
    ("ice cream", "popsicle"),
    ("bus", "subway"),
    ("flashlight", "candle"),
    ("umbrella", "raincoat"),
    ("panda", "polar bear"),
    ("grassland", "desert"),
    ("laptop", "tablet computer"),
    ("turtle", "crocodile"),
    ("scarf", "tie"),
    ("scissors", "box cutter"),
    ("violin", "cello"),
    ("supermarket", "street market"),
    ("restaurant", "fast food place"),
    ("baseball", "softball"),
    ("monkey", "gorilla"),
    ("bracelet", "necklace"),
    ("lighter", "matches"),
];

/// The catalog the game ships with.
pub fn builtin_catalog() -> Vec<WordPair> {
    BUILTIN_PAIRS
        .iter()
        .map(|&(common, undercover)| WordPair::new(common, undercover))
        .collect()
}
