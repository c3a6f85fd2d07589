use super::blocks::*;
use super::common::BlockCommon;
use super::text::TextBlockContent;
use crate::types::BlockId;
use serde::{Deserialize, Serialize};

/// Macro to reduce boilerplate in Block enum methods
macro_rules! match_all_blocks {
    ($self:expr, $pattern:pat => $result:expr) => {
        match $self {
            Block::Page($pattern) => $result,
            Block::Text($pattern) => $result,
            Block::Heading($pattern) => $result,
            Block::Bullet($pattern) => $result,
            Block::Ordered($pattern) => $result,
            Block::Code($pattern) => $result,
            Block::Quote($pattern) => $result,
            Block::Equation($pattern) => $result,
            Block::Todo($pattern) => $result,
            Block::Bitable($pattern) => $result,
            Block::Callout($pattern) => $result,
            Block::ChatCard($pattern) => $result,
            Block::Divider($pattern) => $result,
            Block::File($pattern) => $result,
            Block::Grid($pattern) => $result,
            Block::GridColumn($pattern) => $result,
            Block::Iframe($pattern) => $result,
            Block::Image($pattern) => $result,
            Block::Sheet($pattern) => $result,
            Block::Table($pattern) => $result,
            Block::TableCell($pattern) => $result,
            Block::View($pattern) => $result,
            Block::QuoteContainer($pattern) => $result,
            Block::Board($pattern) => $result,
            Block::Undefined($pattern) => $result,
        }
    };
}

/// Block represents all document block kinds the docx API delivers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block {
    Page(PageBlock),
    Text(TextBlock),
    Heading(HeadingBlock),
    Bullet(BulletBlock),
    Ordered(OrderedBlock),
    Code(CodeBlock),
    Quote(QuoteBlock),
    Equation(EquationBlock),
    Todo(TodoBlock),
    Bitable(BitableBlock),
    Callout(CalloutBlock),
    ChatCard(ChatCardBlock),
    Divider(DividerBlock),
    File(FileBlock),
    Grid(GridBlock),
    GridColumn(GridColumnBlock),
    Iframe(IframeBlock),
    Image(ImageBlock),
    Sheet(SheetBlock),
    Table(TableBlock),
    TableCell(TableCellBlock),
    View(ViewBlock),
    QuoteContainer(QuoteContainerBlock),
    Board(BoardBlock),
    Undefined(UndefinedBlock),
}

impl Block {
    /// Get the block's ID
    pub fn id(&self) -> &BlockId {
        match_all_blocks!(self, b => &b.common.id)
    }

    /// Ids of the block's declared children, in document order
    pub fn children(&self) -> &[BlockId] {
        match_all_blocks!(self, b => &b.common.children)
    }

    pub fn parent_id(&self) -> Option<&BlockId> {
        self.common().parent_id.as_ref()
    }

    /// Check if block has children
    pub fn has_children(&self) -> bool {
        self.common().has_children()
    }

    /// Get common block data
    pub fn common(&self) -> &BlockCommon {
        match_all_blocks!(self, b => &b.common)
    }

    /// Get mutable common block data
    pub fn common_mut(&mut self) -> &mut BlockCommon {
        match_all_blocks!(self, b => &mut b.common)
    }

    pub fn block_type(&self) -> BlockType {
        match self {
            Block::Page(_) => BlockType::Page,
            Block::Text(_) => BlockType::Text,
            Block::Heading(b) => BlockType::heading(b.level),
            Block::Bullet(_) => BlockType::Bullet,
            Block::Ordered(_) => BlockType::Ordered,
            Block::Code(_) => BlockType::Code,
            Block::Quote(_) => BlockType::Quote,
            Block::Equation(_) => BlockType::Equation,
            Block::Todo(_) => BlockType::Todo,
            Block::Bitable(_) => BlockType::Bitable,
            Block::Callout(_) => BlockType::Callout,
            Block::ChatCard(_) => BlockType::ChatCard,
            Block::Divider(_) => BlockType::Divider,
            Block::File(_) => BlockType::File,
            Block::Grid(_) => BlockType::Grid,
            Block::GridColumn(_) => BlockType::GridColumn,
            Block::Iframe(_) => BlockType::Iframe,
            Block::Image(_) => BlockType::Image,
            Block::Sheet(_) => BlockType::Sheet,
            Block::Table(_) => BlockType::Table,
            Block::TableCell(_) => BlockType::TableCell,
            Block::View(_) => BlockType::View,
            Block::QuoteContainer(_) => BlockType::QuoteContainer,
            Block::Board(_) => BlockType::Board,
            Block::Undefined(_) => BlockType::Undefined,
        }
    }

    /// Text payload for text-bearing blocks
    pub fn text_content(&self) -> Option<&TextBlockContent> {
        match self {
            Block::Page(b) => Some(&b.content),
            Block::Text(b) => Some(&b.content),
            Block::Heading(b) => Some(&b.content),
            Block::Bullet(b) => Some(&b.content),
            Block::Ordered(b) => Some(&b.content),
            Block::Code(b) => Some(&b.content),
            Block::Quote(b) => Some(&b.content),
            Block::Equation(b) => Some(&b.content),
            Block::Todo(b) => Some(&b.content),
            _ => None,
        }
    }

    /// Whether this block is a list item of either kind
    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            Block::Bullet(_) => Some(ListKind::Bullet),
            Block::Ordered(_) => Some(ListKind::Ordered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// Numeric block discriminants as used by the docx API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockType {
    Page = 1,
    Text = 2,
    Heading1 = 3,
    Heading2 = 4,
    Heading3 = 5,
    Heading4 = 6,
    Heading5 = 7,
    Heading6 = 8,
    Heading7 = 9,
    Heading8 = 10,
    Heading9 = 11,
    Bullet = 12,
    Ordered = 13,
    Code = 14,
    Quote = 15,
    Equation = 16,
    Todo = 17,
    Bitable = 18,
    Callout = 19,
    ChatCard = 20,
    Divider = 22,
    File = 23,
    Grid = 24,
    GridColumn = 25,
    Iframe = 26,
    Image = 27,
    Sheet = 30,
    Table = 31,
    TableCell = 32,
    View = 33,
    QuoteContainer = 34,
    Board = 43,
    Undefined = 999,
}

impl BlockType {
    pub fn from_code(code: u32) -> Self {
        use BlockType::*;
        match code {
            1 => Page,
            2 => Text,
            3 => Heading1,
            4 => Heading2,
            5 => Heading3,
            6 => Heading4,
            7 => Heading5,
            8 => Heading6,
            9 => Heading7,
            10 => Heading8,
            11 => Heading9,
            12 => Bullet,
            13 => Ordered,
            14 => Code,
            15 => Quote,
            16 => Equation,
            17 => Todo,
            18 => Bitable,
            19 => Callout,
            20 => ChatCard,
            22 => Divider,
            23 => File,
            24 => Grid,
            25 => GridColumn,
            26 => Iframe,
            27 => Image,
            30 => Sheet,
            31 => Table,
            32 => TableCell,
            33 => View,
            34 => QuoteContainer,
            43 => Board,
            _ => Undefined,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    fn heading(level: u8) -> Self {
        Self::from_code(u32::from(level.clamp(1, 9)) + 2)
    }

    /// Heading level for heading types
    pub fn heading_level(self) -> Option<u8> {
        let code = self.code();
        (3..=11).contains(&code).then(|| (code - 2) as u8)
    }

    /// Key of this block's payload object in the API JSON
    pub fn name(self) -> &'static str {
        use BlockType::*;
        match self {
            Page => "page",
            Text => "text",
            Heading1 => "heading1",
            Heading2 => "heading2",
            Heading3 => "heading3",
            Heading4 => "heading4",
            Heading5 => "heading5",
            Heading6 => "heading6",
            Heading7 => "heading7",
            Heading8 => "heading8",
            Heading9 => "heading9",
            Bullet => "bullet",
            Ordered => "ordered",
            Code => "code",
            Quote => "quote",
            Equation => "equation",
            Todo => "todo",
            Bitable => "bitable",
            Callout => "callout",
            ChatCard => "chat_card",
            Divider => "divider",
            File => "file",
            Grid => "grid",
            GridColumn => "grid_column",
            Iframe => "iframe",
            Image => "image",
            Sheet => "sheet",
            Table => "table",
            TableCell => "table_cell",
            View => "view",
            QuoteContainer => "quote_container",
            Board => "board",
            Undefined => "undefined",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_codes() {
        assert_eq!(BlockType::from_code(1), BlockType::Page);
        assert_eq!(BlockType::from_code(5), BlockType::Heading3);
        assert_eq!(BlockType::from_code(43), BlockType::Board);
        assert_eq!(BlockType::from_code(21), BlockType::Undefined);
        assert_eq!(BlockType::from_code(28), BlockType::Undefined);
        assert_eq!(BlockType::Table.code(), 31);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(BlockType::Heading1.heading_level(), Some(1));
        assert_eq!(BlockType::Heading9.heading_level(), Some(9));
        assert_eq!(BlockType::Text.heading_level(), None);
        assert_eq!(BlockType::heading(4), BlockType::Heading4);
    }
}
