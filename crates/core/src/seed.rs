//! Catalog data bundled with the crate.

use crate::catalog::{AdPackage, Catalog, Magazine, MagazineIssue};
use crate::types::Price;

pub const CATEGORIES: &[&str] = &[
    "Fashion",
    "Real Estate",
    "Automobile",
    "Lifestyle",
    "Tech",
    "Food",
];

const PACKAGES: &[(&str, &str, &str, u64)] = &[
    ("pkg1", "Full Page Ad", "A full-page, full-color advertisement.", 500),
    ("pkg2", "Half Page Ad", "A half-page, full-color advertisement.", 300),
    ("pkg3", "Quarter Page Ad", "A quarter-page, full-color advertisement.", 175),
    ("pkg4", "Inside Cover", "Premium placement on the inside front cover.", 800),
    ("pkg5", "Digital Placement", "Banner ad on our digital edition.", 250),
    ("pkg6", "Sponsored Article", "A 2-page feature article written by our team.", 1200),
    ("pkg7", "Social Media Campaign", "A week-long campaign across our social channels.", 600),
];

const PICSUM: &str = "https://picsum.photos/seed";

fn packages() -> Vec<AdPackage> {
    PACKAGES
        .iter()
        .map(|&(id, name, description, price)| AdPackage {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price: Price::whole(price),
        })
        .collect()
}

fn cover(seed: &str) -> Option<String> {
    Some(format!("{PICSUM}/{seed}/400/500"))
}

fn pages(prefix: &str, count: usize) -> Vec<String> {
    (1..=count)
        .map(|n| format!("{PICSUM}/{prefix}_p{n}/800/1000"))
        .collect()
}

fn issue(id: &str, date: &str, cover_url: Option<String>, pages: Vec<String>) -> MagazineIssue {
    MagazineIssue {
        id: id.to_string(),
        date: date.to_string(),
        cover_url,
        pages,
    }
}

fn magazine(
    id: &str,
    name: &str,
    category: &str,
    description: &str,
    thumb_seed: &str,
    issues: Vec<MagazineIssue>,
) -> Magazine {
    Magazine {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        thumbnail_url: format!("{PICSUM}/{thumb_seed}/400/500"),
        media_kit_url: "#".to_string(),
        issues,
        packages: packages(),
    }
}

pub(crate) fn builtin_catalog() -> Catalog {
    let magazines = vec![
        magazine(
            "mag1",
            "Vogue Elevated",
            "Fashion",
            "The pinnacle of fashion journalism. Vogue Elevated sets trends and showcases the most \
             iconic designs and designers from around the globe. A must-read for fashion connoisseurs.",
            "vogue",
            vec![
                issue("issue1a", "October 2023", None, Vec::new()),
                issue("issue1b", "September 2023", cover("vogue_issue2"), pages("vogue", 4)),
                issue("issue1c", "August 2023", None, Vec::new()),
            ],
        ),
        magazine(
            "mag2",
            "Architectural Digest",
            "Real Estate",
            "Explore the world's most beautiful homes. Architectural Digest is the leading \
             international authority on design and architecture, providing exclusive access to \
             stunning properties.",
            "arch",
            vec![
                issue("issue2a", "Fall 2023", cover("arch_issue1"), Vec::new()),
                issue("issue2b", "Summer 2023", cover("arch_issue2"), pages("arch", 2)),
            ],
        ),
        magazine(
            "mag3",
            "Auto Today",
            "Automobile",
            "The ultimate guide for car enthusiasts. Auto Today features in-depth reviews, first \
             drives, and the latest news from the automotive world, from luxury sedans to powerful \
             supercars.",
            "auto",
            vec![
                issue("issue3a", "November 2023", cover("auto_issue1"), Vec::new()),
                issue("issue3b", "October 2023", cover("auto_issue2"), Vec::new()),
                issue("issue3c", "September 2023", cover("auto_issue3"), Vec::new()),
                issue("issue3d", "August 2023", cover("auto_issue4"), Vec::new()),
            ],
        ),
        magazine(
            "mag4",
            "SHOWCASE",
            "Lifestyle",
            "Curating the best in luxury living. SHOWCASE covers everything from travel and fine \
             dining to high-end gadgets and wellness, defining the modern affluent lifestyle.",
            "showcase",
            vec![
                issue("issue4a", "Holiday 2023", None, Vec::new()),
                issue("issue4b", "Autumn 2023", cover("showcase_issue2"), Vec::new()),
            ],
        ),
        magazine(
            "mag5",
            "Wired Forward",
            "Tech",
            "Where tomorrow is realized. Wired Forward explores the future of technology, science, \
             business, and culture, and how they are shaping our world in profound ways.",
            "wired",
            vec![
                issue("issue5a", "October 2023", None, pages("wired", 3)),
                issue("issue5b", "September 2023", None, Vec::new()),
                issue("issue5c", "August 2023", cover("wired_issue3"), Vec::new()),
            ],
        ),
        magazine(
            "mag6",
            "Bon Appétit",
            "Food",
            "For those who love to cook and eat. Bon Appétit delivers delicious recipes, restaurant \
             reviews, and captivating stories from the world of food.",
            "food",
            vec![
                issue("issue6a", "November 2023", cover("food_issue1"), Vec::new()),
                issue("issue6b", "October 2023", cover("food_issue2"), Vec::new()),
            ],
        ),
    ];

    Catalog::from_parts(CATEGORIES.iter().map(|c| c.to_string()).collect(), magazines)
}
