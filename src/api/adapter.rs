// src/api/adapter.rs
//! Adapter layer converting docx wire types into the domain model.

use super::responses::*;
use crate::error::AppError;
use crate::model::blocks::*;
use crate::model::common::BlockCommon;
use crate::model::{
    Align, Block, BlockType, DocumentInfo, TextBlockContent, TextElement, TextElementStyle,
};
use crate::types::{BackgroundColor, BlockId, DocumentId, FontColor};
use serde::de::DeserializeOwned;

/// Convert the document endpoint's payload into [`DocumentInfo`]
pub fn convert_document(raw: RawDocument) -> Result<DocumentInfo, AppError> {
    Ok(DocumentInfo {
        document_id: DocumentId::parse(&raw.document_id)?,
        title: raw.title,
        revision_id: raw.revision_id,
    })
}

/// Convert one listed block into a domain [`Block`]
pub fn convert_block(raw: RawBlock) -> Result<Block, AppError> {
    let RawBlock {
        block_id,
        block_type,
        parent_id,
        children,
        comment_ids,
        mut payload,
    } = raw;

    let kind = BlockType::from_code(block_type);
    let common = BlockCommon {
        id: BlockId::parse(&block_id)?,
        parent_id: (!parent_id.trim().is_empty()).then(|| BlockId::from_raw(parent_id)),
        children: children.into_iter().map(BlockId::from_raw).collect(),
        comment_ids,
    };

    let mut take = |key: &str| payload.remove(key);
    let block = match kind {
        BlockType::Page => Block::Page(PageBlock {
            content: text_content(&common, take("page"))?.0,
            common,
        }),
        BlockType::Text => Block::Text(TextBlock {
            content: text_content(&common, take("text"))?.0,
            common,
        }),
        BlockType::Heading1
        | BlockType::Heading2
        | BlockType::Heading3
        | BlockType::Heading4
        | BlockType::Heading5
        | BlockType::Heading6
        | BlockType::Heading7
        | BlockType::Heading8
        | BlockType::Heading9 => Block::Heading(HeadingBlock {
            level: kind.heading_level().unwrap_or(1),
            content: text_content(&common, take(kind.name()))?.0,
            common,
        }),
        BlockType::Bullet => Block::Bullet(BulletBlock {
            content: text_content(&common, take("bullet"))?.0,
            common,
        }),
        BlockType::Ordered => {
            let (content, style) = text_content(&common, take("ordered"))?;
            Block::Ordered(OrderedBlock {
                content,
                sequence: style.sequence.as_deref().and_then(|s| s.parse().ok()),
                common,
            })
        }
        BlockType::Code => {
            let (content, style) = text_content(&common, take("code"))?;
            Block::Code(CodeBlock {
                content,
                language: style.language.unwrap_or(1),
                wrap: style.wrap,
                common,
            })
        }
        BlockType::Quote => Block::Quote(QuoteBlock {
            content: text_content(&common, take("quote"))?.0,
            common,
        }),
        BlockType::Equation => Block::Equation(EquationBlock {
            content: text_content(&common, take("equation"))?.0,
            common,
        }),
        BlockType::Todo => {
            let (content, style) = text_content(&common, take("todo"))?;
            Block::Todo(TodoBlock {
                content,
                done: style.done,
                common,
            })
        }
        BlockType::Bitable => {
            let raw: RawEmbeddedToken = decode(&common, take("bitable"))?;
            Block::Bitable(BitableBlock {
                common,
                token: raw.token,
                view_type: raw.view_type,
            })
        }
        BlockType::Callout => {
            let raw: RawCallout = decode(&common, take("callout"))?;
            Block::Callout(CalloutBlock {
                background_color: raw.background_color.and_then(background_color),
                border_color: raw.border_color.and_then(font_color),
                text_color: raw.text_color.and_then(font_color),
                emoji_id: raw.emoji_id.filter(|e| !e.is_empty()),
                common,
            })
        }
        BlockType::ChatCard => {
            let raw: RawChatCard = decode(&common, take("chat_card"))?;
            Block::ChatCard(ChatCardBlock {
                common,
                chat_id: raw.chat_id,
            })
        }
        BlockType::Divider => Block::Divider(DividerBlock { common }),
        BlockType::File => {
            let raw: RawFile = decode(&common, take("file"))?;
            Block::File(FileBlock {
                common,
                token: raw.token,
                name: raw.name,
            })
        }
        BlockType::Grid => {
            let raw: RawGrid = decode(&common, take("grid"))?;
            Block::Grid(GridBlock {
                common,
                column_size: raw.column_size,
            })
        }
        BlockType::GridColumn => {
            let raw: RawGridColumn = decode(&common, take("grid_column"))?;
            Block::GridColumn(GridColumnBlock {
                common,
                width_ratio: raw.width_ratio,
            })
        }
        BlockType::Iframe => {
            let raw: RawIframe = decode(&common, take("iframe"))?;
            Block::Iframe(IframeBlock {
                common,
                iframe_type: raw.component.iframe_type,
                url: raw.component.url,
            })
        }
        BlockType::Image => {
            let raw: RawImage = decode(&common, take("image"))?;
            Block::Image(ImageBlock {
                common,
                token: raw.token,
                width: raw.width,
                height: raw.height,
                align: raw.align.map(Align::from_code).unwrap_or_default(),
            })
        }
        BlockType::Sheet => {
            let raw: RawEmbeddedToken = decode(&common, take("sheet"))?;
            Block::Sheet(SheetBlock {
                common,
                token: raw.token,
            })
        }
        BlockType::Table => {
            let raw: RawTable = decode(&common, take("table"))?;
            Block::Table(TableBlock {
                cells: raw.cells.into_iter().map(BlockId::from_raw).collect(),
                property: raw.property.map(convert_table_property),
                common,
            })
        }
        BlockType::TableCell => Block::TableCell(TableCellBlock { common }),
        BlockType::View => {
            let raw: RawView = decode(&common, take("view"))?;
            Block::View(ViewBlock {
                common,
                view_type: raw.view_type,
            })
        }
        BlockType::QuoteContainer => Block::QuoteContainer(QuoteContainerBlock { common }),
        BlockType::Board => {
            let raw: RawImage = decode(&common, take("board"))?;
            Block::Board(BoardBlock {
                common,
                token: raw.token,
                width: raw.width,
                height: raw.height,
                align: raw.align.map(Align::from_code).unwrap_or_default(),
            })
        }
        BlockType::Undefined => {
            log::debug!(
                "Block {} has unsupported type {}; only its children will be rendered",
                common.id,
                block_type
            );
            Block::Undefined(UndefinedBlock {
                common,
                raw_type: block_type,
            })
        }
    };

    Ok(block)
}

/// Decode a variant payload; an absent or `null` payload yields the default.
fn decode<T>(common: &BlockCommon, value: Option<serde_json::Value>) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    match value {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(|e| {
            AppError::MalformedResponse(format!("block {}: {}", common.id, e))
        }),
    }
}

fn text_content(
    common: &BlockCommon,
    value: Option<serde_json::Value>,
) -> Result<(TextBlockContent, RawTextStyle), AppError> {
    let raw: RawText = decode(common, value)?;
    let content = TextBlockContent {
        elements: raw
            .elements
            .into_iter()
            .filter_map(convert_text_element)
            .collect(),
        align: raw.style.align.map(Align::from_code).unwrap_or_default(),
    };
    Ok((content, raw.style))
}

fn convert_text_element(raw: RawTextElement) -> Option<TextElement> {
    if let Some(run) = raw.text_run {
        return Some(TextElement::TextRun {
            content: run.content,
            style: run.text_element_style.map(convert_style),
        });
    }
    if let Some(mention) = raw.mention_user {
        return Some(TextElement::MentionUser {
            user_id: mention.user_id,
            style: mention.text_element_style.map(convert_style),
        });
    }
    if let Some(mention) = raw.mention_doc {
        return Some(TextElement::MentionDoc {
            token: mention.token,
            url: mention.url,
            title: mention.title,
            style: mention.text_element_style.map(convert_style),
        });
    }
    if let Some(equation) = raw.equation {
        return Some(TextElement::Equation {
            content: equation.content,
            style: equation.text_element_style.map(convert_style),
        });
    }
    if let Some(file) = raw.file {
        return Some(TextElement::File {
            file_token: file.file_token,
            style: file.text_element_style.map(convert_style),
        });
    }
    log::debug!("Dropping text element of unknown kind");
    None
}

fn convert_style(raw: RawTextElementStyle) -> TextElementStyle {
    TextElementStyle {
        bold: raw.bold,
        italic: raw.italic,
        strikethrough: raw.strikethrough,
        underline: raw.underline,
        inline_code: raw.inline_code,
        text_color: raw.text_color.and_then(font_color),
        background_color: raw.background_color.and_then(background_color),
        link: raw.link.map(|l| l.url).filter(|url| !url.is_empty()),
    }
}

fn convert_table_property(raw: RawTableProperty) -> TableProperty {
    TableProperty {
        row_size: raw.row_size,
        column_size: raw.column_size,
        column_width: raw.column_width,
        merge_info: raw
            .merge_info
            .into_iter()
            .map(|m| MergeSpan {
                row_span: m.row_span.max(1),
                col_span: m.col_span.max(1),
            })
            .collect(),
        header_row: raw.header_row,
        header_column: raw.header_column,
    }
}

fn font_color(index: u8) -> Option<FontColor> {
    FontColor::try_from(index)
        .map_err(|e| log::debug!("Ignoring text colour: {}", e))
        .ok()
}

fn background_color(index: u8) -> Option<BackgroundColor> {
    BackgroundColor::try_from(index)
        .map_err(|e| log::debug!("Ignoring background colour: {}", e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawBlock {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_convert_heading_with_styled_run() {
        let block = convert_block(raw(json!({
            "block_id": "h1",
            "block_type": 5,
            "parent_id": "doc",
            "heading3": {
                "elements": [{
                    "text_run": {
                        "content": "Title",
                        "text_element_style": {"bold": true, "text_color": 5}
                    }
                }],
                "style": {"align": 2}
            }
        })))
        .unwrap();

        let Block::Heading(heading) = block else {
            panic!("expected heading, got {:?}", block);
        };
        assert_eq!(heading.level, 3);
        assert_eq!(heading.content.align, Align::Center);
        assert_eq!(heading.common.parent_id, Some(BlockId::from_raw("doc".into())));
        let style = heading.content.elements[0].style().unwrap();
        assert!(style.bold);
        assert_eq!(style.text_color, Some(FontColor::Blue));
    }

    #[test]
    fn test_empty_parent_is_none() {
        let block = convert_block(raw(json!({
            "block_id": "doc",
            "block_type": 1,
            "parent_id": "",
            "children": ["a", "b"],
            "page": {"elements": [{"text_run": {"content": "Doc"}}]}
        })))
        .unwrap();

        assert_eq!(block.parent_id(), None);
        assert_eq!(block.children().len(), 2);
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let block = convert_block(raw(json!({
            "block_id": "x",
            "block_type": 40,
            "add_ons": {"component_type_id": "blk_1"}
        })))
        .unwrap();

        assert!(matches!(block, Block::Undefined(UndefinedBlock { raw_type: 40, .. })));
    }

    #[test]
    fn test_out_of_palette_colors_are_dropped() {
        let block = convert_block(raw(json!({
            "block_id": "c",
            "block_type": 19,
            "callout": {"background_color": 99, "border_color": 2, "emoji_id": "bulb"}
        })))
        .unwrap();

        let Block::Callout(callout) = block else {
            panic!("expected callout");
        };
        assert_eq!(callout.background_color, None);
        assert_eq!(callout.border_color, Some(FontColor::Orange));
        assert_eq!(callout.emoji_id.as_deref(), Some("bulb"));
    }

    #[test]
    fn test_table_property_and_merge_spans() {
        let block = convert_block(raw(json!({
            "block_id": "t",
            "block_type": 31,
            "children": ["c1", "c2"],
            "table": {
                "cells": ["c1", "c2"],
                "property": {
                    "row_size": 1,
                    "column_size": 2,
                    "merge_info": [{"row_span": 1, "col_span": 2}, {"row_span": 0, "col_span": 0}],
                    "header_row": true
                }
            }
        })))
        .unwrap();

        let Block::Table(table) = block else {
            panic!("expected table");
        };
        let property = table.property.unwrap();
        assert_eq!(property.merge_info[0].col_span, 2);
        assert_eq!(property.merge_info[1], MergeSpan::default());
        assert!(property.header_row);
        assert!(!property.header_column);
    }

    #[test]
    fn test_malformed_payload_is_reported() {
        let result = convert_block(raw(json!({
            "block_id": "i",
            "block_type": 27,
            "image": {"token": 12}
        })));

        assert!(matches!(result, Err(AppError::MalformedResponse(_))));
    }
}
