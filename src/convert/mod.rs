//! Traditional→simplified script conversion / 繁简转换模块
//!
//! The registry indexes simplified names only; user input may be either
//! script. Conversion is table-driven: char- and phrase-level entries with
//! greedy longest-match-first lookup, the same convention OpenCC uses.
//! Unmapped characters (including all whitespace) pass through unchanged,
//! so conversion is total and never fails.
//!
//! The table is immutable after construction and is shared across requests
//! behind an `Arc` without locking.

use std::collections::HashMap;
use std::path::Path;

/// 繁体→简体映射（单字为主，常用姓氏覆盖），词条优先于单字
///
/// Phrase entries handle context-dependent characters: e.g. 乾→干 in
/// general, but the era name 乾隆 keeps 乾.
const BUILTIN_TABLE: &[(&str, &str)] = &[
    // Phrase-level entries / 词级映射
    ("乾隆", "乾隆"), ("瞭望", "瞭望"),
    // Context-default single characters for the phrases above
    ("乾", "干"), ("瞭", "了"),
    // Common characters / 常用字
    ("國", "国"), ("學", "学"), ("書", "书"), ("電", "电"), ("話", "话"),
    ("語", "语"), ("說", "说"), ("讀", "读"), ("寫", "写"), ("聽", "听"),
    ("見", "见"), ("視", "视"), ("觀", "观"), ("開", "开"), ("關", "关"),
    ("門", "门"), ("間", "间"), ("問", "问"), ("時", "时"), ("當", "当"),
    ("會", "会"), ("應", "应"), ("對", "对"), ("為", "为"), ("無", "无"),
    ("從", "从"), ("來", "来"), ("後", "后"), ("發", "发"), ("動", "动"),
    ("機", "机"), ("車", "车"), ("號", "号"), ("業", "业"), ("產", "产"),
    ("員", "员"), ("務", "务"), ("經", "经"), ("濟", "济"), ("場", "场"),
    ("廠", "厂"), ("區", "区"), ("縣", "县"), ("鄉", "乡"), ("鎮", "镇"),
    ("東", "东"), ("風", "风"), ("雲", "云"), ("長", "长"), ("廣", "广"),
    ("遠", "远"), ("進", "进"), ("過", "过"), ("還", "还"), ("運", "运"),
    ("報", "报"), ("紙", "纸"), ("記", "记"), ("誌", "志"), ("網", "网"),
    ("頁", "页"), ("圖", "图"), ("畫", "画"), ("聲", "声"), ("樂", "乐"),
    ("藝", "艺"), ("術", "术"), ("體", "体"), ("愛", "爱"), ("實", "实"),
    ("現", "现"), ("夢", "梦"), ("裡", "里"), ("頭", "头"), ("臉", "脸"),
    ("點", "点"), ("線", "线"), ("邊", "边"), ("連", "连"), ("錢", "钱"),
    ("買", "买"), ("賣", "卖"), ("價", "价"), ("質", "质"), ("費", "费"),
    ("級", "级"), ("類", "类"), ("種", "种"), ("樣", "样"), ("數", "数"),
    ("統", "统"), ("計", "计"), ("設", "设"), ("備", "备"), ("處", "处"),
    ("辦", "办"), ("總", "总"), ("結", "结"), ("組", "组"), ("織", "织"),
    ("係", "系"), ("聯", "联"), ("歷", "历"), ("認", "认"), ("識", "识"),
    ("證", "证"), ("據", "据"), ("論", "论"), ("談", "谈"), ("議", "议"),
    ("選", "选"), ("決", "决"), ("權", "权"), ("黨", "党"), ("軍", "军"),
    ("戰", "战"), ("鬥", "斗"), ("勝", "胜"), ("敗", "败"), ("條", "条"),
    ("規", "规"), ("則", "则"), ("標", "标"), ("準", "准"), ("廳", "厅"),
    ("館", "馆"), ("樓", "楼"), ("臺", "台"), ("燈", "灯"), ("裝", "装"),
    ("雜", "杂"), ("難", "难"), ("專", "专"), ("師", "师"), ("醫", "医"),
    ("藥", "药"), ("導", "导"), ("養", "养"), ("習", "习"), ("練", "练"),
    ("義", "义"), ("榮", "荣"), ("陣", "阵"), ("犧", "牺"),
    // Common surnames / 常见姓氏
    ("陸", "陆"), ("張", "张"), ("劉", "刘"), ("陳", "陈"), ("楊", "杨"),
    ("趙", "赵"), ("黃", "黄"), ("吳", "吴"), ("鄭", "郑"), ("謝", "谢"),
    ("羅", "罗"), ("蕭", "萧"), ("賴", "赖"), ("馬", "马"), ("馮", "冯"),
    ("鄧", "邓"), ("葉", "叶"), ("蘇", "苏"), ("盧", "卢"), ("韓", "韩"),
    ("孫", "孙"), ("許", "许"), ("嚴", "严"), ("華", "华"), ("衛", "卫"),
    ("鄒", "邹"), ("顧", "顾"), ("齊", "齐"), ("魯", "鲁"), ("韋", "韦"),
    ("鳳", "凤"), ("賀", "贺"), ("湯", "汤"), ("畢", "毕"), ("鄔", "邬"),
    ("龍", "龙"), ("鍾", "钟"), ("藍", "蓝"), ("賈", "贾"), ("閻", "阎"),
    ("紀", "纪"), ("溫", "温"), ("歐", "欧"), ("範", "范"), ("餘", "余"),
    // Place-name characters seen in the location field / 奉祀地点常见字
    ("陽", "阳"), ("灣", "湾"), ("島", "岛"), ("橋", "桥"), ("莊", "庄"),
    ("營", "营"), ("寧", "宁"), ("濱", "滨"), ("瀋", "沈"), ("漢", "汉"),
];

/// Immutable traditional→simplified mapping table / 只读繁简映射表
///
/// Built once at startup and injected into request handling; never mutated
/// afterwards.
#[derive(Debug)]
pub struct ConversionTable {
    map: HashMap<String, String>,
    /// Longest entry key, in chars. Bounds the greedy lookahead.
    max_key_chars: usize,
}

impl ConversionTable {
    /// Builtin mapping table / 内置映射表
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_TABLE.iter().map(|&(f, t)| (f.to_string(), t.to_string())))
            .expect("builtin conversion table entries are valid")
    }

    /// Build a table from (traditional, simplified) pairs.
    ///
    /// Rejects entries whose source contains whitespace: conversion must
    /// never merge or split tokens across whitespace boundaries.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = HashMap::new();
        let mut max_key_chars = 0;

        for (from, to) in pairs {
            if from.is_empty() || to.is_empty() {
                return Err("conversion table entry with empty side".to_string());
            }
            if from.chars().any(char::is_whitespace) {
                return Err(format!(
                    "conversion table entry {:?} contains whitespace",
                    from
                ));
            }
            max_key_chars = max_key_chars.max(from.chars().count());
            map.insert(from, to);
        }

        Ok(Self { map, max_key_chars })
    }

    /// Load an OpenCC-style text dictionary / 加载 OpenCC 文本词典
    ///
    /// One mapping per line: `FROM<TAB>TO [alternatives...]`; the first
    /// candidate wins. `#` comments and blank lines are ignored.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read conversion table {:?}: {}", path, e))?;

        let mut pairs = Vec::new();
        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (from, rest) = line.split_once('\t').ok_or_else(|| {
                format!("{:?} line {}: expected FROM<TAB>TO", path, lineno + 1)
            })?;
            let to = rest.split_whitespace().next().ok_or_else(|| {
                format!("{:?} line {}: missing target", path, lineno + 1)
            })?;
            pairs.push((from.to_string(), to.to_string()));
        }

        let table = Self::from_pairs(pairs)
            .map_err(|e| format!("Invalid conversion table {:?}: {}", path, e))?;
        tracing::info!(
            "Loaded conversion table from {:?} ({} entries)",
            path,
            table.len()
        );
        Ok(table)
    }

    /// Number of mapping entries / 映射条目数
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Convert text to canonical simplified form / 将文本转换为规范简体
    ///
    /// Greedy longest-match-first over the table; characters without an
    /// entry (ASCII, whitespace, already-simplified text) pass through.
    pub fn convert(&self, text: &str) -> String {
        if text.is_empty() || self.map.is_empty() {
            return text.to_string();
        }

        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;

        while i < chars.len() {
            let max_len = self.max_key_chars.min(chars.len() - i);
            let mut matched = false;

            for n in (1..=max_len).rev() {
                let candidate: String = chars[i..i + n].iter().collect();
                if let Some(to) = self.map.get(&candidate) {
                    out.push_str(to);
                    i += n;
                    matched = true;
                    break;
                }
            }

            if !matched {
                out.push(chars[i]);
                i += 1;
            }
        }

        out
    }
}
