//! Built-in catalog data served by default.

use super::models::{
    BlogArticle, CategoryInfo, Difficulty, HowToUseStep, QuickTopic, TocEntry, Tool,
};
use chrono::NaiveDate;

const PRODUCT_IMAGE: &str = "https://placehold.co/400x400.png";
const CATEGORY_IMAGE: &str = "https://placehold.co/300x200.png";
const ARTICLE_THUMBNAIL: &str = "https://placehold.co/400x250.png";
const STEP_MEDIA: &str = "https://placehold.co/600x400.png";

fn category(id: &str, name: &str, ai_hint: &str) -> CategoryInfo {
    CategoryInfo {
        id: id.into(),
        name: name.into(),
        image: CATEGORY_IMAGE.into(),
        ai_hint: Some(ai_hint.into()),
    }
}

pub fn categories() -> Vec<CategoryInfo> {
    vec![
        category("basic", "Basic Tools", "tools hammer"),
        category("construction", "Construction / Concrete Tools", "concrete mixer"),
        category("measuring", "Measuring and Testing Tools", "tape measure"),
        category("home-repair", "Home Repair Tools", "toolbox wrench"),
        category("electrical-general", "Electrical Tools", "multimeter pliers"),
        category("electrical-system", "Electrical System Tools", "circuit breaker"),
        category("accessories", "Accessories / Safety Equipment", "safety goggles"),
        category("gardening", "Gardening Tools", "shovel rake"),
    ]
}

fn step(id: &str, title: &str, description: &str, ai_hint: &str) -> HowToUseStep {
    HowToUseStep {
        id: id.into(),
        title: title.into(),
        media_url: STEP_MEDIA.into(),
        description: description.into(),
        ai_hint: Some(ai_hint.into()),
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn tools() -> Vec<Tool> {
    vec![
        Tool {
            id: "1".into(),
            name: "Heavy Duty Electric Drill XR-5000".into(),
            image: PRODUCT_IMAGE.into(),
            ai_hint: Some("electric drill".into()),
            stock: 3,
            low_stock_threshold: Some(5),
            price_buy: Some(3500),
            price_rent: 500,
            categories: tags(&["basic", "electrical-general"]),
            description_short: Some(
                "A powerful drill for all your home and professional needs. Comes with multiple attachments."
                    .into(),
            ),
            description_full: Some(
                "The XR-5000 is a versatile and robust electric drill designed for a wide range of \
                 applications. Whether you are a DIY enthusiast or a professional contractor, this \
                 drill offers the power and precision you need. Features variable speed control, a \
                 comfortable grip, and a durable chuck."
                    .into(),
            ),
            rating: Some(4.5),
            sku: Some("HD-ED-XR5000".into()),
            weight: Some("2.5 kg".into()),
            packaging_dimensions: Some("30cm x 20cm x 10cm".into()),
            brand: Some("PowerTool Pro".into()),
            power: Some("750W".into()),
            cord_length: Some("3m".into()),
            warranty: Some("2 years".into()),
            rotation_speed: Some("0-3000 RPM".into()),
            features: tags(&[
                "Variable speed control",
                "Keyless chuck",
                "Ergonomic handle",
                "LED work light",
            ]),
            specs: [
                ("Voltage", "220-240V"),
                ("Frequency", "50Hz"),
                ("Chuck Capacity", "1.5-13mm"),
                ("Max Drilling (Wood)", "30mm"),
                ("Max Drilling (Steel)", "13mm"),
                ("Max Drilling (Masonry)", "16mm"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            how_to_use_steps: vec![
                step(
                    "step1",
                    "Safety First",
                    "Always wear safety goggles and gloves before operating the drill.",
                    "safety equipment",
                ),
                step(
                    "step2",
                    "Insert Bit",
                    "Ensure the drill is unplugged. Open the chuck, insert the desired drill bit, and tighten the chuck firmly.",
                    "drill bit",
                ),
                step(
                    "step3",
                    "Set Speed",
                    "Select the appropriate speed setting for your material. Lower speeds for metal, higher for wood.",
                    "speed control",
                ),
                step(
                    "step4",
                    "Drilling",
                    "Hold the drill firmly with both hands. Apply steady pressure and begin drilling.",
                    "drilling wood",
                ),
            ],
            ..Default::default()
        },
        Tool {
            id: "2".into(),
            name: "Professional Laser Level Kit".into(),
            image: PRODUCT_IMAGE.into(),
            ai_hint: Some("laser level".into()),
            stock: 8,
            low_stock_threshold: Some(3),
            price_buy: Some(2200),
            price_rent: 300,
            categories: tags(&["measuring"]),
            description_short: Some(
                "Achieve perfect alignment with this professional-grade laser level. Ideal for hanging pictures, installing shelves, and more."
                    .into(),
            ),
            rating: Some(4.8),
            ..Default::default()
        },
        Tool {
            id: "3".into(),
            name: "Compact Circular Saw CS-150".into(),
            image: PRODUCT_IMAGE.into(),
            ai_hint: Some("circular saw".into()),
            stock: 5,
            price_rent: 600,
            categories: tags(&["construction", "electrical-general"]),
            description_short: Some(
                "Lightweight yet powerful circular saw for precise cuts in wood and plastic.".into(),
            ),
            rating: Some(4.2),
            ..Default::default()
        },
        Tool {
            id: "4".into(),
            name: "Industrial Wet/Dry Vacuum Cleaner".into(),
            image: PRODUCT_IMAGE.into(),
            ai_hint: Some("vacuum cleaner".into()),
            stock: 2,
            low_stock_threshold: Some(2),
            price_buy: Some(4800),
            price_rent: 750,
            categories: tags(&["home-repair", "accessories"]),
            description_short: Some(
                "High-capacity vacuum for cleaning up workshops, garages, and renovation sites."
                    .into(),
            ),
            rating: Some(4.6),
            ..Default::default()
        },
        Tool {
            id: "5".into(),
            name: "Basic Hand Tool Set (25 Pieces)".into(),
            image: PRODUCT_IMAGE.into(),
            ai_hint: Some("tool set".into()),
            stock: 15,
            price_buy: Some(1200),
            price_rent: 150,
            categories: tags(&["basic", "home-repair"]),
            description_short: Some(
                "Essential hand tools for everyday repairs and DIY projects. Includes hammer, screwdrivers, pliers, and more."
                    .into(),
            ),
            rating: Some(4.0),
            ..Default::default()
        },
        Tool {
            id: "6".into(),
            name: "Concrete Mixer CM-50L".into(),
            image: PRODUCT_IMAGE.into(),
            ai_hint: Some("concrete mixer".into()),
            stock: 4,
            price_rent: 1200,
            categories: tags(&["construction"]),
            description_short: Some(
                "50-liter capacity concrete mixer for small to medium-sized projects.".into(),
            ),
            rating: Some(4.3),
            ..Default::default()
        },
    ]
}

pub fn quick_topics() -> Vec<QuickTopic> {
    [
        ("1", "Planning to renovate? These tools might suit you.", "/equipment?category=home-repair"),
        ("2", "What tools do I need for concrete work?", "/blog/guide-concrete-tools"),
        ("3", "Deck building essentials", "/blog/deck-building-guide"),
        ("4", "Basic tools for beginners", "/equipment?category=basic"),
    ]
    .into_iter()
    .map(|(id, text, link)| QuickTopic {
        id: id.into(),
        text: text.into(),
        link: link.into(),
    })
    .collect()
}

const CONCRETE_GUIDE_CONTENT: &str = r#"
<h2>Introduction to Concrete Work</h2>
<p>Concrete work can be challenging but rewarding. Having the right tools is crucial for success.</p>
<h3>1. Mixing Tools</h3>
<p>A good quality concrete mixer can save you a lot of time and effort. For smaller jobs, a wheelbarrow and shovel might suffice.</p>
<h3>2. Pouring and Spreading Tools</h3>
<p>Use shovels, rakes, and concrete spreaders to distribute the concrete evenly.</p>
<h3>3. Finishing Tools</h3>
<p>Trowels, floats, and edgers are essential for a smooth and professional finish.</p>
<p>Remember to always prioritize safety by wearing appropriate gear like gloves, boots, and eye protection.</p>
"#;

struct ArticleSeed {
    slug: &'static str,
    title: &'static str,
    excerpt: &'static str,
    ai_hint: &'static str,
    difficulty: Difficulty,
    duration: &'static str,
    cost: &'static str,
    date: Option<NaiveDate>,
}

impl ArticleSeed {
    fn build(self) -> BlogArticle {
        BlogArticle {
            slug: self.slug.into(),
            title: self.title.into(),
            subtitle: None,
            excerpt: self.excerpt.into(),
            thumbnail: ARTICLE_THUMBNAIL.into(),
            difficulty: self.difficulty,
            duration: self.duration.into(),
            cost: self.cost.into(),
            content: None,
            related_products: Vec::new(),
            toc: Vec::new(),
            date: self.date,
            ai_hint: Some(self.ai_hint.into()),
        }
    }
}

/// Articles; related products are resolved against `tools`.
pub fn articles(tools: &[Tool]) -> Vec<BlogArticle> {
    let mut concrete_guide = ArticleSeed {
        slug: "guide-concrete-tools",
        title: "The Ultimate Guide to Concrete Work Tools",
        excerpt: "Working with concrete requires specific tools for mixing, pouring, and finishing. This guide covers the essentials...",
        ai_hint: "concrete tools",
        difficulty: Difficulty::Medium,
        duration: "2-3 hours read/prep",
        cost: "Varies",
        date: NaiveDate::from_ymd_opt(2023, 10, 26),
    }
    .build();
    concrete_guide.subtitle = Some("Everything you need to know for your next concrete project.".into());
    concrete_guide.content = Some(CONCRETE_GUIDE_CONTENT.trim().into());
    concrete_guide.related_products = tools
        .iter()
        .filter(|t| t.in_category("construction"))
        .take(3)
        .cloned()
        .collect();
    concrete_guide.toc = [
        ("intro", "Introduction", 2),
        ("mixing", "Mixing Tools", 3),
        ("pouring", "Pouring and Spreading", 3),
        ("finishing", "Finishing Tools", 3),
        ("safety", "Safety Gear", 3),
    ]
    .into_iter()
    .map(|(id, title, level)| TocEntry {
        id: id.into(),
        title: title.into(),
        level,
    })
    .collect();

    let rest = [
        ArticleSeed {
            slug: "deck-building-guide",
            title: "How to Build a Deck: A Beginner's Guide",
            excerpt: "Learn the basics of deck construction, from planning to finishing touches. We list the tools you'll need.",
            ai_hint: "wood deck",
            difficulty: Difficulty::Hard,
            duration: "Weekend project",
            cost: "฿10,000 - ฿50,000",
            date: NaiveDate::from_ymd_opt(2023, 11, 5),
        },
        ArticleSeed {
            slug: "basic-home-repairs",
            title: "Top 5 Basic Home Repairs You Can Do Yourself",
            excerpt: "Save money and gain satisfaction by tackling these simple home repairs with basic tools.",
            ai_hint: "home repair",
            difficulty: Difficulty::Easy,
            duration: "1-2 hours per repair",
            cost: "Low",
            date: NaiveDate::from_ymd_opt(2023, 9, 15),
        },
        ArticleSeed {
            slug: "painting-like-a-pro",
            title: "Painting Techniques for a Professional Finish",
            excerpt: "Learn simple techniques to make your next painting project look like it was done by a professional.",
            ai_hint: "painting wall",
            difficulty: Difficulty::Easy,
            duration: "3-4 hours",
            cost: "Low",
            date: NaiveDate::from_ymd_opt(2023, 11, 10),
        },
        ArticleSeed {
            slug: "choosing-right-ladder",
            title: "Choosing the Right Ladder for the Job",
            excerpt: "Safety first! This guide helps you select the appropriate ladder for different tasks around the house.",
            ai_hint: "ladder safety",
            difficulty: Difficulty::Easy,
            duration: "30 min read",
            cost: "Varies",
            date: NaiveDate::from_ymd_opt(2023, 10, 1),
        },
        ArticleSeed {
            slug: "garden-tool-maintenance",
            title: "Essential Maintenance for Your Gardening Tools",
            excerpt: "Keep your gardening tools in top shape with these simple maintenance tips for longevity and performance.",
            ai_hint: "gardening tools",
            difficulty: Difficulty::Easy,
            duration: "1 hour",
            cost: "Very Low",
            date: NaiveDate::from_ymd_opt(2023, 9, 20),
        },
    ];

    std::iter::once(concrete_guide)
        .chain(rest.into_iter().map(ArticleSeed::build))
        .collect()
}
