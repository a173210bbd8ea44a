//! Ring (ring-lang.net).

use crate::grammar::{Child, Grammar, GrammarBuilder, KeywordSet, Pattern, Result, RuleSpec};

const IDENT: &str = r"[\p{L}_@$][\w@$]*";

const KEYWORD_SETS: [&str; 6] = [
    "keyword",
    "keyword.declaration",
    "keyword.namespace",
    "keyword.pseudo",
    "operator.word",
    "built_in",
];

const KEYWORDS: &[&str] = &[
    "if", "but", "elseif", "else", "other", "ok", "endif", "end", "switch", "on", "case", "off",
    "endswitch", "for", "in", "to", "step", "next", "endfor", "foreach", "while", "endwhile",
    "do", "again", "return", "bye", "exit", "break", "loop", "continue", "call", "try", "catch",
    "done", "endtry", "see", "put", "give", "get",
];

const DECLARATION_KEYWORDS: &[&str] = &[
    "class",
    "endclass",
    "from",
    "func",
    "def",
    "function",
    "endfunc",
    "endfunction",
    "package",
    "endpackage",
    "private",
];

const NAMESPACE_KEYWORDS: &[&str] = &["load", "import"];

const PSEUDO_KEYWORDS: &[&str] = &["new", "self", "this", "super"];

const OPERATOR_WORDS: &[&str] = &["and", "or", "not"];

const BUILTIN_VALUES: &[&str] = &[
    "true",
    "false",
    "nl",
    "null",
    "tab",
    "cr",
    "sysargv",
    "ccatcherror",
    "ringoptionalfunctions",
];

const SCANNER_COMMANDS: &[&str] = &[
    "changeringkeyword",
    "changeringoperator",
    "disablehashcomments",
    "enablehashcomments",
    "loadsyntax",
];

const BUILTIN_FUNCTIONS: &[&str] = &[
    "acos", "add", "addattribute", "adddays", "addmethod", "ascii", "asin", "assert", "atan",
    "atan2", "attributes", "binarysearch", "bytes2double", "bytes2float", "bytes2int",
    "callgarbagecollector", "callgc", "ceil", "cfunctions", "char", "chdir", "checkoverflow",
    "classes", "classname", "clearerr", "clock", "clockspersecond", "closelib", "copy", "cos",
    "cosh", "currentdir", "date", "dec", "decimals", "del", "diffdays", "dir", "direxists",
    "double2bytes", "eval", "exefilename", "exefolder", "exp", "fabs", "fclose", "feof",
    "ferror", "fexists", "fflush", "fgetc", "fgetpos", "fgets", "filename", "find",
    "float2bytes", "floor", "fopen", "fputc", "fputs", "fread", "freopen", "fseek", "fsetpos",
    "ftell", "functions", "fwrite", "getarch", "getattribute", "getchar", "getfilesize",
    "getnumber", "getpathtype", "getpointer", "getptr", "getstring", "globals", "hex",
    "hex2str", "importpackage", "input", "insert", "int2bytes", "intvalue", "isalnum",
    "isalpha", "isandroid", "isattribute", "iscfunction", "isclass", "iscntrl", "isdigit",
    "isfreebsd", "isfunction", "isglobal", "isgraph", "islinux", "islist", "islocal",
    "islower", "ismacosx", "ismethod", "ismsdos", "isnull", "isnumber", "isobject",
    "ispackage", "ispackageclass", "ispointer", "isprint", "isprivateattribute",
    "isprivatemethod", "ispunct", "isspace", "isstring", "isunix", "isupper", "iswindows",
    "iswindows64", "isxdigit", "left", "len", "lines", "list", "list2str", "loadlib", "locals",
    "log", "log10", "lower", "max", "memcpy", "memorycopy", "mergemethods", "methods", "min",
    "murmur3hash", "newlist", "nofprocessors", "nothing", "nullpointer", "nullptr", "number",
    "obj2ptr", "object2pointer", "objectid", "optionalfunc", "packageclasses", "packagename",
    "packages", "parentclassname", "perror", "pointer2object", "pointer2string",
    "pointercompare", "pow", "prevfilename", "print", "print2str", "ptr2obj", "ptr2str",
    "ptrcmp", "puts", "raise", "random", "randomize", "read", "ref", "reference", "refcount",
    "remove", "rename", "reverse", "rewind", "right", "ring_give", "ring_see",
    "ring_state_delete", "ring_state_filetokens", "ring_state_findvar", "ring_state_init",
    "ring_state_main", "ring_state_mainfile", "ring_state_new", "ring_state_newvar",
    "ring_state_resume", "ring_state_runcode", "ring_state_runcodeatins", "ring_state_runfile",
    "ring_state_runobjectfile", "ring_state_scannererror", "ring_state_setvar",
    "ring_state_stringtokens", "ringvm_callfunc", "ringvm_calllist", "ringvm_cfunctionslist",
    "ringvm_classeslist", "ringvm_codelist", "ringvm_evalinscope", "ringvm_fileslist",
    "ringvm_functionslist", "ringvm_genarray", "ringvm_give", "ringvm_hideerrormsg",
    "ringvm_info", "ringvm_ismempool", "ringvm_memorylist", "ringvm_packageslist",
    "ringvm_passerror", "ringvm_runcode", "ringvm_scopescount", "ringvm_see",
    "ringvm_settrace", "ringvm_tracedata", "ringvm_traceevent", "ringvm_tracefunc",
    "setattribute", "setpointer", "setptr", "shutdown", "sin", "sinh", "sort", "space", "sqrt",
    "srandom", "str2hex", "str2hexcstyle", "str2list", "strcmp", "string", "substr", "swap",
    "sysget", "sysset", "syssleep", "system", "sysunset", "tan", "tanh", "tempfile",
    "tempname", "time", "timelist", "trim", "type", "ungetc", "unsigned", "upper", "uptime",
    "variablepointer", "varptr", "version", "windowsnl", "write",
];

const NUMBER_VARIANTS: [&str; 5] = [
    r"\b0x[a-f0-9_]+\b",
    r"\b0b[01_]+\b",
    r"\b0o[0-7_]+\b",
    r"\b[0-9]+(?:_[0-9]+)*\.[0-9]*(?:_[0-9]+)*(?:[eE][-+]?[0-9]+)?\b",
    r"\b[0-9]+(?:_[0-9]+)*\b",
];

const OPERATOR: &str =
    r"\+\+|--|\*\*|\^\^|!=|<=|>=|<<|>>|&&|\|\||\+=|-=|\*=|/=|%=|<<=|>>=|&=|\|=|\^=|[-+/*%=<>&|!~.:^?]";

/// Declarations whose name follows a keyword: (keyword trigger, title label, keywords,
/// title pattern).
const DECLARATIONS: [(&str, &str, &[&str], &str); 5] = [
    ("class", "title.class", &["class"], IDENT),
    (
        "function",
        "title.function",
        &["func", "def", "function"],
        IDENT,
    ),
    (
        "package",
        "title.class.inherited",
        &["package", "import"],
        r"[\p{L}_@$][\w@$.]*",
    ),
    ("from", "title.class.inherited", &["from"], IDENT),
    ("new", "title.class", &["new"], IDENT),
];

pub(super) fn build() -> Result<Grammar> {
    let mut g = GrammarBuilder::new("ring")
        .case_insensitive(true)
        .sigils("@$");

    g.keyword_set(KeywordSet::new(KEYWORD_SETS[0], "keyword", KEYWORDS))
        .keyword_set(KeywordSet::new(
            KEYWORD_SETS[1],
            "keyword.declaration",
            DECLARATION_KEYWORDS,
        ))
        .keyword_set(KeywordSet::new(
            KEYWORD_SETS[2],
            "keyword.namespace",
            NAMESPACE_KEYWORDS,
        ))
        .keyword_set(KeywordSet::new(
            KEYWORD_SETS[3],
            "keyword.pseudo",
            PSEUDO_KEYWORDS,
        ))
        .keyword_set(KeywordSet::new(
            KEYWORD_SETS[4],
            "operator.word",
            OPERATOR_WORDS,
        ))
        .keyword_set(KeywordSet::new(KEYWORD_SETS[5], "built_in", BUILTIN_VALUES));

    let line_comment = g.add(
        RuleSpec::region("comment.line", Pattern::literal("//"), Pattern::regex("$"))
            .label("comment")
            .relevance(0),
    );
    let hash_comment = g.add(
        RuleSpec::region("comment.hash", Pattern::literal("#"), Pattern::regex("$"))
            .label("comment")
            .relevance(0),
    );
    let block_comment = g.add(
        RuleSpec::region(
            "comment.block",
            Pattern::regex(r"/\*"),
            Pattern::regex(r"\*/"),
        )
        .label("comment")
        .relevance(0)
        .children([Child::This]),
    );
    let meta = g.add(
        RuleSpec::single(
            "meta",
            Pattern::regex(format!(r"^\s*(?:{})\b", SCANNER_COMMANDS.join("|"))),
        )
        .label("meta")
        .relevance(10),
    );

    let escape = g.add(RuleSpec::single("escape", Pattern::regex(r"\\[\s\S]")).relevance(0));
    let subst = g.add(
        RuleSpec::region("subst", Pattern::regex(r"#\{"), Pattern::regex(r"\}"))
            .label("subst")
            .keywords(KEYWORD_SETS),
    );
    let strings = [("string.double", "\""), ("string.single", "'"), ("string.backtick", "`")]
        .map(|(name, quote)| {
            g.add(
                RuleSpec::region(name, Pattern::literal(quote), Pattern::literal(quote))
                    .label("string")
                    .children([escape, subst]),
            )
        });

    let symbol =
        g.add(RuleSpec::single("symbol", Pattern::regex(format!(":{}", IDENT))).label("symbol"));

    let mut declarations = Vec::with_capacity(DECLARATIONS.len() * 2);
    for (name, title, keywords, pattern) in DECLARATIONS {
        let trigger = format!(r"\b(?:{})\b", keywords.join("|"));
        declarations.push(g.add(
            RuleSpec::region(
                format!("{}.keyword", name),
                Pattern::regex(trigger),
                Pattern::lookahead(r"\s"),
            )
            .label("keyword")
            .relevance(0),
        ));
        declarations.push(g.add(
            RuleSpec::single(format!("{}.title", name), Pattern::regex(pattern))
                .label(title)
                .relevance(10)
                .preceded_by(keywords.iter().copied()),
        ));
    }

    let builtin_call = g.add(
        RuleSpec::single(
            "builtin.call",
            Pattern::regex(format!(r"\b(?:{})\b", BUILTIN_FUNCTIONS.join("|"))),
        )
        .label("built_in")
        .followed_by(r"\s*\("),
    );
    let invoke = g.add(
        RuleSpec::single("call", Pattern::regex(format!(r"\b{}", IDENT)))
            .label("title.function.invoke")
            .relevance(0)
            .followed_by(r"\s*\(")
            .unless_keyword(),
    );
    let numbers: Vec<_> = NUMBER_VARIANTS
        .iter()
        .enumerate()
        .map(|(i, pattern)| {
            g.add(
                RuleSpec::single(format!("number[{}]", i), Pattern::regex(*pattern))
                    .label("number"),
            )
        })
        .collect();
    let operator =
        g.add(RuleSpec::single("operator", Pattern::regex(OPERATOR)).label("operator"));

    // Interpolations nest and may hold further string literals.
    let mut subst_children: Vec<Child> = vec![Child::This];
    subst_children.extend(strings.iter().copied().map(Child::from));
    subst_children.extend(numbers.iter().copied().map(Child::from));
    g.set_children(subst, subst_children);

    for id in [line_comment, hash_comment, block_comment, meta]
        .into_iter()
        .chain(strings)
        .chain([symbol])
        .chain(declarations)
        .chain([builtin_call, invoke])
        .chain(numbers)
        .chain([operator])
    {
        g.push_top(id);
    }

    g.build()
}

#[cfg(test)]
#[path = "../../tests/unit/languages/ring.rs"]
mod tests;
