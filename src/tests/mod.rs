mod unit_config;
mod unit_markdown_pages_parser;
