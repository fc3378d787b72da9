use page_arrange::render::{write_pdf, write_svg, PdfOptions};
use page_arrange::{
    colours, Arrange, ArrangeConfig, ArrangeRects, Arrangeable, Colour, ColumnArrangeable, Pt,
    Rect,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("page_arrange=info".parse().expect("valid directive")),
        )
        .init();

    let mut glossary = ColumnArrangeable::new("glossary", 3).with_gaps(Pt(6.0), Pt(2.0));
    for (i, word) in ["arena", "borrow", "crate", "derive", "enum", "field", "generic", "heap"]
        .iter()
        .enumerate()
    {
        glossary.add_rect(
            Rect::new(8.0 * word.len() as f64, 12.0)
                .with_id(format!("term.{i}"))
                .with_colour(colours::PINK),
        );
    }

    let mut listings = Arrangeable::new("listings", ArrangeConfig::default());
    listings
        .add_rect(Rect::new(220.0, 140.0).with_id("main.rs").with_colour(colours::PANEL))
        .add_rect(Rect::new(160.0, 90.0).with_id("lib.rs").with_colour(colours::PANEL))
        .add_rect(Rect::new(90.0, 60.0).with_id("util.rs").with_colour(colours::PANEL));
    listings.add_child(glossary).expect("child names are unique");

    let mut page = Arrangeable::new(
        "page",
        ArrangeConfig::default().with_snapshot_path("arrange-grid.svg"),
    );
    page.add_rect(Rect::new(300.0, 40.0).with_id("title").with_colour(colours::BLUE))
        .add_rect(Rect::new(120.0, 120.0).with_id("figure").with_colour(Colour::new_rgb_bytes(250, 200, 120)));
    page.add_child(listings).expect("child names are unique");

    let mut sidebar = vec![
        Rect::new(80.0, 200.0).with_id("toc").with_colour(colours::GREEN),
        Rect::new(80.0, 50.0).with_id("note"),
    ];
    ArrangeRects::default()
        .arrange(&mut sidebar)
        .expect("can arrange sidebar");

    let mut arrangeables: Vec<Box<dyn Arrange>> = vec![Box::new(page)];
    let matrix = ArrangeRects::default()
        .arrange_arrangeables(&mut arrangeables)
        .expect("can arrange page");
    println!("{matrix}");

    write_svg("arrange.svg", matrix.get_rects()).expect("can write svg");
    write_svg("sidebar.svg", &sidebar).expect("can write svg");

    let options = PdfOptions::default()
        .with_title("Arranged blocks")
        .with_author("page-arrange");
    let out = std::fs::File::create("arrange.pdf").expect("can create output file");
    write_pdf(matrix.get_rects(), &options, std::io::BufWriter::new(out)).expect("can write pdf");

    let size = matrix.get_allocated_size();
    let sidebar_size = page_arrange::bounding_size(&sidebar);
    println!(
        "placed {} blocks in {}x{}; sidebar uses {}x{}",
        matrix.get_rects().len(),
        size.width,
        size.height,
        sidebar_size.width,
        sidebar_size.height,
    );
}
