//! Command-line interface for transcript PDF reconstruction.
//!
//! Configuration precedence: CLI flags override the merged TOML layers,
//! which override compiled defaults.

use clap::Parser;
use transcript_press::config::{self, DEFAULT_COMMON_CONFIG, DEFAULT_MISSION_CONFIG};
use transcript_press::error::Result;
use transcript_press::fonts;
use transcript_press::layout::{parse_pages_spec, resolve_selection, SelectionRequest};
use transcript_press::render;
use transcript_press::transcript::{require_pages, resolve_input_path, Transcript};

#[derive(Parser, Debug)]
#[command(
    name = "transcript-press",
    version,
    about = "Recreate a transcript PDF from JSON using a monospaced typeface"
)]
struct Cli {
    #[arg(long, default_value = DEFAULT_COMMON_CONFIG, help = "Common TOML configuration")]
    common_config: String,
    #[arg(long, default_value = DEFAULT_MISSION_CONFIG, help = "Mission TOML configuration")]
    mission_config: String,
    #[arg(long, help = "Path to JSON input")]
    json: Option<String>,
    #[arg(long, help = "Output PDF path")]
    out: Option<String>,
    #[arg(long, help = "First page number to include")]
    start_page: Option<i64>,
    #[arg(long, help = "Last page number to include")]
    end_page: Option<i64>,
    #[arg(long, default_value = "", help = "CSV page numbers or ranges: 3,5,10-12")]
    pages: String,
    #[arg(long, default_value = "", help = "PDF pages or ranges (1-based)")]
    pdf_pages: String,
    #[arg(long, help = "First PDF page (1-based)")]
    pdf_start_page: Option<i64>,
    #[arg(long, help = "Last PDF page (1-based)")]
    pdf_end_page: Option<i64>,
    #[arg(long, help = "PDF page N maps to JSON page (N - offset)")]
    pdf_offset: Option<i64>,
    #[arg(long, help = "Path to TTF font")]
    font: Option<String>,
    #[arg(long, help = "Font size in points")]
    font_size: Option<f32>,
    #[arg(long, help = "Left margin in points (default: auto-center text block)")]
    left_margin_pt: Option<f32>,
    #[arg(long, help = "Line height multiplier")]
    line_height_multiplier: Option<f32>,
    #[arg(long, help = "Total monospace columns")]
    columns: Option<usize>,
    #[arg(long, help = "Spaces between wrapped words")]
    space_len: Option<usize>,
    #[arg(long, help = "Reference DPI recorded in the PDF metadata")]
    dpi: Option<u32>,
    #[arg(long, help = "Page width in points")]
    page_width_pt: Option<f32>,
    #[arg(long, help = "Page height in points")]
    page_height_pt: Option<f32>,
    #[arg(long, help = "Top margin in points")]
    top_margin_pt: Option<f32>,
    #[arg(long, help = "Bottom margin in points")]
    bottom_margin_pt: Option<f32>,
    #[arg(long, help = "Auto-reduce line height to fit full page")]
    fit_to_page: bool,
    #[arg(long, conflicts_with = "fit_to_page", help = "Disable line-height auto-fit")]
    no_fit_to_page: bool,
    #[arg(long, help = "Extra draw offset in points to simulate a slightly bolder font")]
    faux_bold_pt: Option<f32>,
    #[arg(long, help = "Header title line for mission pages")]
    title_line: Option<String>,
    #[arg(long, help = "Flush-left header line text")]
    header_line: Option<String>,
    #[arg(long, help = "Extra blank lines before annotation blocks")]
    annotation_top_blank_lines: Option<usize>,
    #[arg(long, help = "Column index for END OF TAPE alignment")]
    end_of_tape_indent_col: Option<usize>,
    #[arg(long, help = "Center rest-period text block")]
    center_rest_period_text: bool,
    #[arg(
        long,
        conflicts_with = "center_rest_period_text",
        help = "Disable centered rest-period text"
    )]
    no_center_rest_period_text: bool,
    #[arg(long, help = "Keep normal page header on centered rest-period pages")]
    rest_period_keep_header: bool,
    #[arg(
        long,
        conflicts_with = "rest_period_keep_header",
        help = "Hide page header on centered rest-period pages"
    )]
    no_rest_period_keep_header: bool,
    #[arg(long, help = "Apply rest-period centering only on pages with no comm blocks")]
    rest_period_only_when_no_comm: bool,
    #[arg(
        long,
        conflicts_with = "rest_period_only_when_no_comm",
        help = "Apply rest-period centering even when comm blocks exist"
    )]
    no_rest_period_only_when_no_comm: bool,
}

/// Fold an on/off flag pair over the configured value.
fn toggle(on: bool, off: bool, configured: bool) -> bool {
    if off {
        false
    } else if on {
        true
    } else {
        configured
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = config::load_settings(&cli.common_config, &cli.mission_config)?;

    // CLI overrides
    if let Some(json) = cli.json {
        settings.paths.json = json;
    }
    if let Some(out) = cli.out {
        settings.paths.out = out;
    }
    if let Some(font) = cli.font {
        settings.paths.font = font;
    }
    if let Some(start_page) = cli.start_page {
        settings.selection.start_page = start_page;
    }
    if cli.end_page.is_some() {
        settings.selection.end_page = cli.end_page;
    }
    if let Some(pdf_offset) = cli.pdf_offset {
        settings.selection.pdf_offset = pdf_offset;
    }

    let layout = &mut settings.layout;
    if let Some(font_size) = cli.font_size {
        layout.font_size = font_size;
    }
    if cli.left_margin_pt.is_some() {
        layout.left_margin_pt = cli.left_margin_pt;
    }
    if let Some(multiplier) = cli.line_height_multiplier {
        layout.line_height_multiplier = multiplier;
    }
    if let Some(columns) = cli.columns {
        layout.columns = columns;
    }
    if let Some(space_len) = cli.space_len {
        layout.space_len = space_len;
    }
    if let Some(dpi) = cli.dpi {
        layout.dpi = dpi;
    }
    if let Some(width) = cli.page_width_pt {
        layout.page_width_pt = width;
    }
    if let Some(height) = cli.page_height_pt {
        layout.page_height_pt = height;
    }
    if let Some(top) = cli.top_margin_pt {
        layout.top_margin_pt = top;
    }
    if let Some(bottom) = cli.bottom_margin_pt {
        layout.bottom_margin_pt = bottom;
    }
    if let Some(faux_bold) = cli.faux_bold_pt {
        layout.faux_bold_pt = faux_bold;
    }
    layout.fit_to_page = toggle(cli.fit_to_page, cli.no_fit_to_page, layout.fit_to_page);

    let style = &mut settings.style;
    if let Some(title_line) = cli.title_line {
        style.title_line = title_line;
    }
    if let Some(header_line) = cli.header_line {
        style.header_line = header_line;
    }
    if let Some(blanks) = cli.annotation_top_blank_lines {
        style.annotation_top_blank_lines = blanks;
    }
    if let Some(indent) = cli.end_of_tape_indent_col {
        style.end_of_tape_indent_col = indent;
    }
    style.center_rest_period_text = toggle(
        cli.center_rest_period_text,
        cli.no_center_rest_period_text,
        style.center_rest_period_text,
    );
    style.rest_period_keep_header = toggle(
        cli.rest_period_keep_header,
        cli.no_rest_period_keep_header,
        style.rest_period_keep_header,
    );
    style.rest_period_only_when_no_comm = toggle(
        cli.rest_period_only_when_no_comm,
        cli.no_rest_period_only_when_no_comm,
        style.rest_period_only_when_no_comm,
    );

    let json_path = resolve_input_path(&settings.paths.json);
    let transcript = Transcript::load(&json_path)?;
    require_pages(&transcript)?;

    let request = SelectionRequest {
        pages: parse_pages_spec(&cli.pages)?,
        page_start: settings.selection.start_page,
        page_end: settings.selection.end_page,
        pdf_pages: parse_pages_spec(&cli.pdf_pages)?,
        pdf_start: cli.pdf_start_page,
        pdf_end: cli.pdf_end_page,
        pdf_offset: settings.selection.pdf_offset,
    };
    let selection = resolve_selection(&transcript, &request)?;

    let font = fonts::load_font(&settings.paths.font)?;
    let out_path = render::resolve_output_path(&settings.paths.out);

    render::render_to_file(
        &transcript,
        &selection,
        &settings.layout,
        &settings.style,
        &font,
        &out_path,
    )
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
