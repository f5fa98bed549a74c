//! The fixed rule banks: one checker per exercise, plus the multiple-choice
//! questions and quizzes. This is the whole teaching rule set for the site,
//! expressed as data and grouped by lesson page.
//!
//! The checks are deliberately forgiving (substring containment and loose
//! patterns, not parsing): the goal is a pedagogical nudge, not a correctness
//! proof. Pass semantics vary per exercise (AND of fragments vs OR of
//! accepted phrasings) and are kept exactly as each lesson defines them.

use regex::Regex;

use crate::domain::{
  Alternative, Checker, ChoiceQuestion, Exercise, Feedback, NearMiss, PassRule, Predicate, Quiz,
  QuizQuestion, Requirement,
};

fn re(p: &str) -> Result<Regex, String> {
  Regex::new(p).map_err(|e| format!("invalid rule pattern '{p}': {e}"))
}

fn matches(p: &str) -> Result<Predicate, String> {
  Ok(Predicate::Matches(re(p)?))
}

fn has(s: &'static str) -> Predicate {
  Predicate::Contains(s)
}

fn has_any(alts: &'static [&'static str]) -> Predicate {
  Predicate::ContainsAny(alts)
}

/// AND of fragments, one fixed corrective message on failure.
fn all_fixed(
  requirements: Vec<Requirement>,
  success: &'static str,
  failure: &'static str,
) -> Checker {
  Checker {
    pass: PassRule::All(requirements),
    success,
    feedback: Feedback::Fixed(failure),
    near_misses: vec![],
  }
}

/// AND of fragments, failure enumerates the unmet ones after a lead-in.
fn all_itemized(
  requirements: Vec<Requirement>,
  success: &'static str,
  lead_in: &'static str,
  clause_suffix: &'static str,
) -> Checker {
  Checker {
    pass: PassRule::All(requirements),
    success,
    feedback: Feedback::Itemized { lead_in, clause_suffix },
    near_misses: vec![],
  }
}

/// OR of accepted phrasings, one fixed corrective message on failure.
fn any_fixed(
  alternatives: Vec<Alternative>,
  success: &'static str,
  failure: &'static str,
) -> Checker {
  Checker {
    pass: PassRule::Any(alternatives),
    success,
    feedback: Feedback::Fixed(failure),
    near_misses: vec![],
  }
}

/// Every free-text exercise on the site. Order is stable and drives the
/// `/api/v1/exercises` listing.
pub fn exercise_bank() -> Result<Vec<Exercise>, String> {
  let mut bank = Vec::new();

  // --- data-import lesson ---

  bank.push(Exercise {
    id: "excel-exercise",
    topic: "data-import",
    checker: any_fixed(
      vec![
        Alternative::of(vec![matches(
          r#"read_excel\s*\(\s*file\s*=\s*["']sales_data\.xlsx["']\s*,\s*sheet\s*=\s*1\s*\)"#,
        )?]),
        Alternative::of(vec![matches(
          r#"read_excel\s*\(\s*["']sales_data\.xlsx["']\s*,\s*sheet\s*=\s*1\s*\)"#,
        )?]),
      ],
      "Correct! You've correctly specified the file and sheet, ensuring the comma is present.",
      "Not quite right. Ensure you use `read_excel`, specify the file (e.g., `file = \"sales_data.xlsx\"` or just the path) and the sheet (`sheet = 1`), separated by a comma.",
    ),
  });

  bank.push(Exercise {
    id: "export-exercise",
    topic: "data-import",
    checker: all_fixed(
      vec![
        Requirement::bare(has("write.csv")),
        Requirement::bare(has("row.names")),
        Requirement::bare(has("FALSE")),
      ],
      "Correct! Adding `row.names = FALSE` prevents writing the row names to the CSV file.",
      "Not quite right. You need to add `row.names = FALSE` to the `write.csv()` function call.",
    ),
  });

  // --- data-types lesson ---

  bank.push(Exercise {
    id: "vector-exercise",
    topic: "data-types",
    checker: Checker {
      pass: PassRule::Any(vec![
        Alternative::of(vec![matches(r"seq\s*\(.*2.*,.*10.*,.*(by\s*=\s*2|2)\s*\)")?]),
        Alternative::of(vec![matches(r"c\s*\(\s*2\s*,\s*4\s*,\s*6\s*,\s*8\s*,\s*10\s*\)")?]),
      ]),
      success: "Looks correct! This code should generate the vector c(2, 4, 6, 8, 10).",
      feedback: Feedback::Fixed(
        "Not quite right, or not in a recognized format. Common ways are using `seq(2, 10, by=2)` or `c(2, 4, 6, 8, 10)`.",
      ),
      near_misses: vec![NearMiss {
        when: vec![has("seq"), Predicate::Lacks(")")],
        message:
          "Looks like you might be missing a closing parenthesis ')' in your seq() function.",
      }],
    },
  });

  // --- programmatic-r lesson ---

  bank.push(Exercise {
    id: "loops-exercise",
    topic: "programmatic-r",
    checker: all_fixed(
      vec![
        Requirement::bare(has("for")),
        Requirement::bare(has("in 1:10")),
        Requirement::bare(has_any(&["i^2", "i*i"])),
        Requirement::bare(has("print")),
      ],
      "Correct! You've written a for loop to print the squares of numbers.",
      "Not quite right. Make sure you have a `for` loop iterating from 1 to 10 and print `i^2` inside the loop.",
    ),
  });

  bank.push(Exercise {
    id: "nested-loops-exercise",
    topic: "programmatic-r",
    checker: all_fixed(
      vec![
        Requirement::bare(has("for")),
        Requirement::bare(has("in 1:5")),
        Requirement::bare(has("i * j")),
        Requirement::bare(has("print")),
      ],
      "Correct! You've created a nested loop structure. Ensure it prints `i * j` to generate the table.",
      "Not quite right. Make sure to use nested `for` loops (e.g., `for (i in 1:5)` and `for (j in 1:5)`) and calculate/print `i * j`.",
    ),
  });

  bank.push(Exercise {
    id: "conditional-statements-exercise",
    topic: "programmatic-r",
    checker: all_fixed(
      vec![
        Requirement::bare(has("if")),
        Requirement::bare(has("%% 2 == 0")),
        Requirement::bare(has("else")),
        Requirement::bare(has_any(&["even", "odd"])),
      ],
      "Correct! You've written an if-else statement using the modulo operator `%%` to check for even or odd numbers.",
      "Not quite right. Make sure to use `if (x %% 2 == 0)` to check for even numbers and include both `if` and `else` clauses.",
    ),
  });

  bank.push(Exercise {
    id: "case-when-exercise",
    topic: "programmatic-r",
    checker: all_fixed(
      vec![
        Requirement::bare(has("case_when")),
        Requirement::bare(has("< 32")),
        Requirement::bare(has(">= 32")),
        Requirement::bare(has(">= 50")),
        Requirement::bare(has(">= 70")),
        Requirement::bare(has("> 85")),
        Requirement::bare(has("Freezing")),
        Requirement::bare(has("Hot")),
      ],
      "Correct! You've created a `case_when` statement with conditions covering the required temperature categories.",
      "Not quite right. Make sure to use `case_when` and include conditions for all temperature categories (Freezing, Cold, Mild, Warm, Hot) with the correct thresholds.",
    ),
  });

  bank.push(Exercise {
    id: "function-exercise",
    topic: "programmatic-r",
    checker: all_fixed(
      vec![
        Requirement::bare(has("calculate_bmi")),
        Requirement::bare(has("function")),
        Requirement::bare(has("weight")),
        Requirement::bare(has("height")),
        Requirement::bare(has_any(&[
          "weight / (height^2)",
          "weight / height**2",
          "weight / (height * height)",
        ])),
        Requirement::bare(has("round")),
      ],
      "Correct! You've created a function named `calculate_bmi` that takes height and weight, calculates BMI, and rounds the result.",
      "Not quite right. Ensure your function is named `calculate_bmi`, takes `height` and `weight` arguments, calculates `weight / height^2`, and uses `round()`.",
    ),
  });

  bank.push(Exercise {
    id: "functional-programming-exercise",
    topic: "programmatic-r",
    checker: all_fixed(
      vec![
        Requirement::bare(has("map")),
        Requirement::bare(has("numbers")),
        Requirement::bare(has_any(&["sqrt", ".x^0.5", ".x**0.5"])),
      ],
      "Correct! You've used a `map` function (like `map()` or `map_dbl()`) with `sqrt` or an equivalent calculation.",
      "Not quite right. Make sure to use a function from the `map` family (e.g., `map_dbl(numbers, sqrt)`) or an equivalent lambda expression like `map_dbl(numbers, ~ sqrt(.x))`.",
    ),
  });

  bank.push(Exercise {
    id: "pmap-exercise",
    topic: "programmatic-r",
    checker: all_fixed(
      vec![
        Requirement::bare(has("pmap")),
        Requirement::bare(has("products")),
        Requirement::bare(has("price")),
        Requirement::bare(has("tax")),
        Requirement::bare(has("discount")),
        Requirement::bare(has("1 - disc")),
        Requirement::bare(has("1 + tax")),
      ],
      "Correct! You've used `pmap` (likely `pmap_dbl`) to iterate through the product list and apply the correct pricing formula.",
      "Not quite right. Make sure to use `pmap` (e.g., `pmap_dbl`) on the `products` list and apply the formula: `(price * (1 - discount)) * (1 + tax)` inside the function.",
    ),
  });

  bank.push(Exercise {
    id: "error-handling-exercise",
    topic: "programmatic-r",
    checker: all_fixed(
      vec![
        Requirement::bare(has_any(&["safely", "possibly"])),
        Requirement::bare(has("log")),
        Requirement::bare(has("NA")),
      ],
      "Correct! You've used an error handling function like `safely` or `possibly` with `log` and returned `NA` for invalid inputs.",
      "Not quite right. Use `safely(log)` or `possibly(log, otherwise = NA)` and apply it to the vector (e.g., using `map`). Ensure invalid inputs result in `NA`.",
    ),
  });

  bank.push(Exercise {
    id: "file-processing-exercise",
    topic: "programmatic-r",
    checker: all_fixed(
      vec![
        Requirement::bare(has("list.files")),
        // map_df, or map combined with bind_rows
        Requirement::bare(Predicate::AnyOf(vec![
          has("map_df"),
          Predicate::AllOf(vec![has("map"), has("bind_rows")]),
        ])),
        Requirement::bare(has("read.csv")),
        Requirement::bare(has("group_by")),
        Requirement::bare(has("category")),
        Requirement::bare(has("summarize")),
        Requirement::bare(has("mean")),
        Requirement::bare(has("sum")),
        Requirement::bare(has("n()")),
        Requirement::bare(has("write.csv")),
      ],
      "Looks good! Your script seems to include the key steps: listing files, reading/combining CSVs, grouping by category, summarizing (count, mean, sum), and writing the result.",
      "Not quite right. Ensure your script uses `list.files`, reads and combines the data (e.g., with `map_df` or `map`+`bind_rows`), uses `group_by(category)` and `summarize()` to calculate count, mean, and sum of 'value', and finally uses `write.csv`.",
    ),
  });

  // --- r-basics lesson ---

  bank.push(Exercise {
    id: "func-exercise",
    topic: "r-basics",
    // Still requires both TRUE and FALSE to appear literally even though a
    // single-expression body is valid R; kept as the lesson defines it.
    checker: all_fixed(
      vec![
        Requirement::bare(has("is_even")),
        Requirement::bare(has("function")),
        Requirement::bare(has("number")),
        Requirement::bare(has("%% 2 == 0")),
        Requirement::bare(has_any(&["TRUE", "return(TRUE)"])),
        Requirement::bare(has_any(&["FALSE", "return(FALSE)"])),
      ],
      "Good job! Your function `is_even` correctly checks for even numbers using the modulo operator.",
      "Your function doesn't seem to meet all requirements. Check that it's named 'is_even', takes one argument, uses `%% 2 == 0` to check, and returns TRUE/FALSE.",
    ),
  });

  // --- rmarkdown lesson ---

  bank.push(Exercise {
    id: "intro-exercise",
    topic: "rmarkdown",
    checker: Checker {
      pass: PassRule::All(vec![
        Requirement::new(
          matches(
            r#"---[\s\S]*title:[\s\S]*author:[\s\S]*date:[\s\S]*output:\s*html_document[\s\S]*---"#,
          )?,
          "YAML header (--- block) with title, author, date, and html_document output",
        ),
        Requirement::new(
          matches(r"##\s*Data Analysis")?,
          "Level 2 heading (## Data Analysis)",
        ),
        Requirement::new(
          matches(r"```\{r[\s\S]*mtcars[\s\S]*mean\(mtcars\$mpg\)[\s\S]*```")?,
          "R code chunk loading mtcars and calculating mean(mtcars$mpg)",
        ),
        // The conclusion has to come after the last code fence.
        Requirement::new(
          Predicate::MatchesAfterLast {
            marker: "```",
            pattern: re(r"(?i)(Conclusion|Summary|Finding|Result)[\s\S]*mean MPG")?,
          },
          "Conclusion paragraph mentioning the findings",
        ),
      ]),
      success: "Correct! Your R Markdown document contains all the required elements: YAML header, Data Analysis section (##), code chunk with mtcars and mean MPG calculation, and a conclusion.",
      feedback: Feedback::Itemized {
        lead_in: "Your solution is missing some elements: ",
        clause_suffix: "; ",
      },
      near_misses: vec![],
    },
  });

  bank.push(Exercise {
    id: "yaml-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(r#"(?i)title:\s*["']?Sales Analysis Report["']?"#)?,
          "title 'Sales Analysis Report'",
        ),
        Requirement::new(
          matches(r"(?i)(toc:\s*true[\s\S]*toc_float:\s*true|toc_float:\s*true[\s\S]*toc:\s*true)")?,
          "floating table of contents (toc: true, toc_float: true)",
        ),
        Requirement::new(matches(r"toc_depth:\s*2")?, "TOC depth of 2 (toc_depth: 2)"),
        Requirement::new(
          matches(r"(?i)number_sections:\s*true")?,
          "section numbering (number_sections: true)",
        ),
        Requirement::new(
          matches(r#"(?i)theme:\s*["']?flatly["']?"#)?,
          "'flatly' theme (theme: flatly)",
        ),
        Requirement::new(
          matches(r#"(?i)code_folding:\s*["']?hide["']?"#)?,
          "collapsible code sections, hidden by default (code_folding: hide)",
        ),
        Requirement::new(
          matches(r#"(?i)params:[\s\S]*quarter:\s*["']?Q1["']?"#)?,
          "quarter parameter with default value 'Q1' (params: quarter: Q1)",
        ),
      ],
      "Correct! Your YAML header includes all the required elements and configurations.",
      "Your YAML header is missing some required elements: ",
      "; ",
    ),
  });

  bank.push(Exercise {
    id: "chunks-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(
            r#"```\{r\s+setup[\s\S]*opts_chunk\$set\([\s\S]*warning\s*=\s*FALSE[\s\S]*message\s*=\s*FALSE[\s\S]*fig\.align\s*=\s*["']center["']?[\s\S]*\)[\s\S]*```"#,
          )?,
          "Setup chunk suppressing warnings/messages and centering figures",
        ),
        Requirement::new(
          matches(
            r"```\{r[\s\S]*(echo\s*=\s*FALSE)?[\s\S]*(message\s*=\s*FALSE)?[\s\S]*library\(ggplot2\)[\s\S]*```",
          )?,
          "Chunk loading ggplot2 without showing code or messages (echo=FALSE, message=FALSE)",
        ),
        Requirement::new(
          matches(
            r"```\{r[\s\S]*fig\.width\s*=\s*10[\s\S]*fig\.height\s*=\s*6[\s\S]*hist\(mtcars\$mpg\)[\s\S]*```",
          )?,
          "Chunk creating histogram of mtcars$mpg with fig.width=10, fig.height=6",
        ),
      ],
      "Correct! Your code chunks correctly implement the setup options, load ggplot2 silently (or without messages/code), and create the histogram with specified dimensions.",
      "Your solution is missing some required code chunks or options: ",
      "; ",
    ),
  });

  bank.push(Exercise {
    id: "markdown-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(r"(?m)^##\s+Data Analysis Results")?,
          "Level 2 heading (## Data Analysis Results)",
        ),
        Requirement::new(
          matches(r"(?m)##\s+Data Analysis Results\s*\n+([^\n]+)\n+")?,
          "Explanatory paragraph after heading",
        ),
        Requirement::new(
          matches(r"(?m)(\n\s*(\*|\-|\+)\s+[^\n]+){3,}")?,
          "Bulleted list with three findings",
        ),
        // Header row, separator row, and at least two body cells.
        Requirement::new(
          Predicate::AllOf(vec![
            matches(r"(?i)\|\s*Region\s*\|")?,
            matches(r"\|\s*---+\s*\|")?,
            matches(r"(?m)(\|\s*[^\n|]+\s*\|){2,}")?,
          ]),
          "Table showing results for different regions",
        ),
        Requirement::new(
          matches(r"(?i)\[more information\]\(http[s]?://[^)]+\)")?,
          "Link to 'more information'",
        ),
      ],
      "Correct! Your markdown formatting includes all required elements: level 2 heading, paragraph, bullet list, table, and link.",
      "Your solution is missing some markdown elements: ",
      "; ",
    ),
  });

  // Feedback for the two format families is nested: when a family is missing
  // entirely, its per-option clauses are suppressed via gates.
  let html_output = matches(r"(?m)output:[\s\S]*html_document:")?;
  let pdf_output = matches(r"(?m)output:[\s\S]*pdf_document:")?;
  bank.push(Exercise {
    id: "output-formats-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(html_output.clone(), "HTML output format (`html_document:`)"),
        Requirement::gated(
          matches(
            r"(?im)html_document:[\s\S]*(toc:\s*true[\s\S]*toc_float:\s*true|toc_float:\s*true[\s\S]*toc:\s*true)",
          )?,
          "HTML floating TOC (`toc: true`, `toc_float: true`)",
          html_output.clone(),
        ),
        Requirement::gated(
          matches(r#"(?im)html_document:[\s\S]*theme:\s*["']?flatly["']?"#)?,
          "HTML 'flatly' theme (`theme: flatly`)",
          html_output.clone(),
        ),
        Requirement::gated(
          matches(r#"(?im)html_document:[\s\S]*code_folding:\s*["']?show["']?"#)?,
          "HTML code folding set to 'show' (`code_folding: show`)",
          html_output,
        ),
        Requirement::new(pdf_output.clone(), "PDF output format (`pdf_document:`)"),
        Requirement::gated(
          matches(r"(?im)pdf_document:[\s\S]*toc:\s*true")?,
          "PDF table of contents (`toc: true`)",
          pdf_output.clone(),
        ),
        Requirement::gated(
          matches(r#"(?im)pdf_document:[\s\S]*latex_engine:\s*["']?xelatex["']?"#)?,
          "PDF 'xelatex' engine (`latex_engine: xelatex`)",
          pdf_output.clone(),
        ),
        Requirement::gated(
          matches(r"(?im)pdf_document:[\s\S]*fig_caption:\s*true")?,
          "PDF figure captions (`fig_caption: true`)",
          pdf_output,
        ),
      ],
      "Correct! Your YAML header correctly specifies both HTML and PDF output formats with all required options.",
      "Your YAML header is missing some required output format specifications: ",
      "; ",
    ),
  });

  bank.push(Exercise {
    id: "knitr-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(
            r#"```\{r\s+setup[\s\S]*opts_chunk\$set\([\s\S]*cache\s*=\s*TRUE[\s\S]*dev\s*=\s*["']png["'][\s\S]*dpi\s*=\s*300[\s\S]*fig\.align\s*=\s*["']center["']?[\s\S]*\)[\s\S]*```"#,
          )?,
          "Setup chunk with cache=TRUE, dev='png', dpi=300, fig.align='center'",
        ),
        Requirement::new(
          matches(
            r#"```\{r[\s\S]*knitr::include_graphics\(["']logo\.png["']\)[\s\S]*out\.width\s*=\s*["']50%["'][\s\S]*```"#,
          )?,
          "Chunk including 'logo.png' with out.width='50%'",
        ),
        Requirement::new(
          matches(
            r#"```\{r[\s\S]*knitr::kable\(head\(mtcars\)\)[\s\S]*caption\s*=\s*["']Car Performance Data["'][\s\S]*```"#,
          )?,
          "Chunk creating a kable table from `head(mtcars)` with caption 'Car Performance Data'",
        ),
      ],
      "Correct! Your knitr code includes all required elements: a setup chunk with appropriate options, image inclusion, and a table with caption.",
      "Your solution is missing some required knitr elements: ",
      "; ",
    ),
  });

  bank.push(Exercise {
    id: "pandoc-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(
            r#"(?im)(pdf_document:[\s\S]*geometry:\s*["']?margin=1\.5in["']?|geometry:\s*["']?margin=1\.5in["']?|pandoc_args:[\s\S]*--variable=geometry:margin=1\.5in)"#,
          )?,
          "Setting margins to 1.5 inches for PDF (e.g., using `geometry: margin=1.5in` or `pandoc_args`)",
        ),
        Requirement::new(
          matches(r#"(?im)html_document:[\s\S]*css:\s*["']?custom\.css["']?"#)?,
          "Adding `custom.css` file to HTML (`css: custom.css`)",
        ),
        Requirement::new(
          matches(
            r#"(?im)(pdf_document:|html_document:)[\s\S]*(fontsize:\s*["']?11pt["']?|classoption:.*11pt.*|pandoc_args:[\s\S]*--variable=fontsize:11pt)"#,
          )?,
          "Specifying 11pt font size (e.g., `fontsize: 11pt` or via `pandoc_args`)",
        ),
      ],
      "Correct! Your YAML header includes Pandoc options for 1.5 inch margins (PDF), custom CSS (HTML), and 11pt font size.",
      "Your YAML header is missing some required Pandoc options: ",
      "; ",
    ),
  });

  bank.push(Exercise {
    id: "params-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(r#"(?i)params:[\s\S]*department:\s*["']?Sales["']?"#)?,
          "`department` parameter with default 'Sales'",
        ),
        Requirement::new(
          matches(
            r#"(?i)params:[\s\S]*year:\s*(!r\s*as\.numeric\(format\(Sys\.Date\(\),\s*["']%Y["']\)\)|\d{4})"#,
          )?,
          "`year` parameter defaulting to the current year (e.g., using `!r as.numeric(format(Sys.Date(), '%Y'))`)",
        ),
        Requirement::new(
          matches(r"(?i)params:[\s\S]*include_charts:\s*(TRUE|true)")?,
          "`include_charts` boolean parameter defaulting to TRUE",
        ),
        Requirement::new(
          matches(
            r#"(?im)params:[\s\S]*data_source:[\s\S]*input:\s*select[\s\S]*choices:\s*\[["']?Database["']?,\s*["']?CSV["']?,\s*["']?API["']?\]"#,
          )?,
          "`data_source` parameter with select input and options 'Database', 'CSV', 'API'",
        ),
      ],
      "Correct! Your YAML header includes all required parameters with appropriate defaults and configurations (assuming year defaults correctly).",
      "Your YAML header is missing some required parameters: ",
      "; ",
    ),
  });

  bank.push(Exercise {
    id: "tables-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(r#"(?i)knitr::kable\(head\(iris.*\)\s*,\s*caption\s*=\s*["'][^"']+["']\)"#)?,
          "Use `knitr::kable(head(iris), caption=...)`",
        ),
        Requirement::new(
          matches(
            r#"(?i)kableExtra::kable_styling\([\s\S]*(bootstrap_options\s*=\s*c\(.*["']striped["']|stripe\s*=\s*)"#,
          )?,
          "Use `kableExtra::kable_styling()` to add stripes",
        ),
        Requirement::new(
          matches(r"(?i)column_spec\(1,\s*bold\s*=\s*TRUE\)")?,
          "Use `column_spec(1, bold = TRUE)` for the first column",
        ),
        Requirement::new(
          matches(r"(?i)(summarise|summarize|aggregate|add_row|rbind)[\s\S]*mean")?,
          "Add logic to calculate and potentially add a summary row (e.g., using `add_row` or `rbind` after calculating means)",
        ),
      ],
      "Looks good! Your code seems to include kable with a caption, kableExtra styling for stripes, bolding the first column, and logic for a summary row (ensure the summary row is actually added to the final table).",
      "Your solution is missing some required table elements: ",
      "; ",
    ),
  });

  bank.push(Exercise {
    id: "figures-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(r"(?i)ggplot\(iris,\s*aes\(.*Sepal\.Length.*Sepal\.Width.*\)\)")?,
          "ggplot() call with iris data, mapping Sepal.Length to x, Sepal.Width to y",
        ),
        Requirement::new(
          matches(r"(?i)aes\(.*color\s*=\s*Species.*\)")?,
          "Mapping Species to the color aesthetic",
        ),
        Requirement::new(
          Predicate::AllOf(vec![
            matches(r"(?i)labs\(.*title\s*=")?,
            matches(r"(?i)labs\(.*x\s*=")?,
            matches(r"(?i)labs\(.*y\s*=")?,
          ]),
          "Adding appropriate title and axis labels using `labs()`",
        ),
        Requirement::new(
          matches(
            r"(?i)(fig\.width\s*=\s*8[\s\S]*fig\.height\s*=\s*5|ggsave\(.*width\s*=\s*8.*height\s*=\s*5\))",
          )?,
          "Setting figure dimensions (e.g., `fig.width=8, fig.height=5` in chunk options)",
        ),
        Requirement::new(
          matches(r#"(?i)fig\.cap\s*=\s*["']Iris flower measurements by species["']?"#)?,
          "Adding the figure caption (e.g., `fig.cap=...` in chunk options)",
        ),
      ],
      "Correct! Your code creates a ggplot2 visualization of the iris dataset with all required specifications (mapping, labels, dimensions, caption).",
      "Your solution is missing some required figure elements: ",
      "; ",
    ),
  });

  bank.push(Exercise {
    id: "interactive-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(matches(r"(?i)library\(plotly\)")?, "Load the plotly library"),
        Requirement::new(matches(r"(?i)ggplotly\(")?, "Use `ggplotly()` to convert a ggplot"),
        Requirement::new(matches(r"(?i)diamonds")?, "Use the diamonds dataset"),
        Requirement::new(
          matches(r"(?i)aes\(.*price.*carat|aes\(.*carat.*price")?,
          "Plot price vs carat",
        ),
        Requirement::new(
          Predicate::AllOf(vec![
            matches(
              r"(?i)aes\(.*text\s*=\s*paste|aes\(.*text\s*=\s*str_glue|aes\(.*text\s*=\s*glue",
            )?,
            matches(r"(?i)cut|color|clarity")?,
          ]),
          "Map details (cut, color, clarity) to the `text` aesthetic for hover info",
        ),
        Requirement::new(
          matches(r"(?i)aes\(.*color\s*=\s*cut.*\)")?,
          "Map `cut` to the color aesthetic",
        ),
      ],
      "Correct! Your code uses plotly/ggplotly, plots price vs carat from diamonds, includes hover text with cut/color/clarity, and colors by cut.",
      "Your solution is missing some required interactive elements: ",
      "; ",
    ),
  });

  bank.push(Exercise {
    id: "advanced-exercise",
    topic: "rmarkdown",
    // Any one of the advanced features counts; the success message names the
    // first one that matched.
    checker: any_fixed(
      vec![
        Alternative::labeled(
          "custom CSS styling",
          vec![matches(r"(?i)(<style>|css:.*\.css|class\s*=)")?],
        ),
        Alternative::labeled(
          "a memory usage hook/check",
          vec![matches(r"knit_hooks\$set\([\s\S]*memory|gc\(|object\.size\(|mem_used\(")?],
        ),
        Alternative::labeled(
          "multi-language R and Python code",
          vec![matches(r"(?im)```\{r[\s\S]*```[\s\S]*```\{python[\s\S]*```")?],
        ),
      ],
      "Looks promising! Your code appears to implement an advanced R Markdown feature using {feature}. Ensure it functions as intended.",
      "Your solution doesn't seem to contain clear indicators of the requested advanced features (custom CSS, memory hook, or multi-language chunks). Please review the examples.",
    ),
  });

  bank.push(Exercise {
    id: "workflow-exercise",
    topic: "rmarkdown",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(r"(?i)(data/|code/|reports/|output/)")?,
          "Mention separate folders for data, code, reports",
        ),
        Requirement::new(
          matches(r"(?i)params:|render\(.*params\s*=")?,
          "Describe using parameterized reports (YAML params)",
        ),
        Requirement::new(
          Predicate::AllOf(vec![
            matches(r"(?i)render\(|knit\(|build\(|walk\(.*render")?,
            matches(r"(?i)for\s*\(|map\(|walk\(")?,
          ]),
          "Include a script to render multiple reports (e.g., using a loop and `render()`)",
        ),
        Requirement::new(
          matches(r"(?i)renv|packrat|sessionInfo|session_info|library\(|require\(")?,
          "Address dependency management (e.g., using `renv` or documenting with `sessionInfo()`)",
        ),
      ],
      "Good! Your description outlines a workflow including folder structure, parameterized reports, a rendering script, and dependency management considerations.",
      "Your workflow description seems incomplete: ",
      "; ",
    ),
  });

  // --- r-quirks lesson ---

  bank.push(Exercise {
    id: "assignment-exercise",
    topic: "r-quirks",
    checker: any_fixed(
      vec![
        Alternative::of(vec![Predicate::Equals("answer <- 42")]),
        Alternative::of(vec![has("answer"), has("<-"), has("42")]),
      ],
      "Correct! You've used the preferred assignment operator `<-`.",
      "Not quite right. Use `answer <- 42` for assignment in scripts.",
    ),
  });

  bank.push(Exercise {
    id: "data-types-exercise",
    topic: "r-quirks",
    checker: all_fixed(
      vec![
        Requirement::bare(has("data.frame")),
        Requirement::bare(has("id =")),
        Requirement::bare(has("name =")),
        Requirement::bare(has("score =")),
      ],
      "Correct! You've created a data frame with the required columns: id, name, and score.",
      "Not quite right. Make sure to use `data.frame()` and include `id`, `name`, and `score` as columns (e.g., `data.frame(id = ..., name = ..., score = ...)`).",
    ),
  });

  bank.push(Exercise {
    id: "logical-values-exercise",
    topic: "r-quirks",
    checker: all_fixed(
      vec![
        Requirement::bare(has("score > 80")),
        Requirement::bare(has_any(&["&", "&&"])),
        Requirement::bare(has("score < 100")),
      ],
      "Correct! You've checked if the score is between 80 and 100 using comparison and logical AND operators.",
      "Not quite right. Make sure to use `score > 80` and `score < 100`, combining them with the AND operator (`&` or `&&`).",
    ),
  });

  // --- visualization lesson ---

  bank.push(Exercise {
    id: "basic-plot-exercise",
    topic: "visualization",
    checker: all_fixed(
      vec![Requirement::bare(matches(
        r"(?i)ggplot\s*\(\s*data\s*=\s*iris\s*,\s*aes\s*\(\s*x\s*=\s*Sepal\.Length\s*,\s*y\s*=\s*Petal\.Length\s*,\s*color\s*=\s*Species\s*\)\s*\)\s*\+\s*geom_point\s*\(\s*\)",
      )?)],
      "Correct! This code will create a scatter plot of Sepal.Length vs Petal.Length colored by Species.",
      "Not quite right. The correct answer should map `Sepal.Length` to x, `Petal.Length` to y, and `Species` to color within `aes()`, and add `+ geom_point()`.",
    ),
  });

  // --- spatial lesson ---

  bank.push(Exercise {
    id: "import-exercise",
    topic: "spatial",
    checker: all_fixed(
      vec![Requirement::bare(has_any(&["st_read", "st_read()"]))],
      "Correct! The `st_read()` function is used to import vector spatial data (like shapefiles) in the sf package.",
      "Not quite right. The function to read shapefiles with sf is `st_read()`.",
    ),
  });

  bank.push(Exercise {
    id: "case-study-exercise",
    topic: "spatial",
    checker: all_itemized(
      vec![
        Requirement::new(
          matches(r"(?i)group_by\s*\(\s*economy\s*\)")?,
          "You should `group_by(economy)`.",
        ),
        Requirement::new(
          matches(r"(?i)mean\s*\(\s*gdp_per_capita.*\)")?,
          "Use `summarize()` with `mean(gdp_per_capita)` to calculate the average.",
        ),
        Requirement::new(
          matches(r"(?i)arrange\s*\(\s*desc\s*\(\s*avg_gdp_per_capita\s*\)\s*\)")?,
          "Use `arrange(desc(avg_gdp_per_capita))` to show highest values first.",
        ),
      ],
      "Correct! This code groups by `economy`, calculates the `mean(gdp_per_capita)`, and arranges in descending order.",
      "Not quite right. ",
      " ",
    ),
  });

  Ok(bank)
}

/// Standalone multiple-choice questions (one radio group each), checked by
/// exact option comparison.
pub fn choice_bank() -> Vec<ChoiceQuestion> {
  vec![
    ChoiceQuestion {
      id: "assignment-q1",
      topic: "r-basics",
      correct: "b",
      options: &[
        ("a", "= is the only assignment operator"),
        ("b", "<- is the conventional assignment operator"),
        ("c", ":= is the conventional assignment operator"),
      ],
    },
    ChoiceQuestion {
      id: "pipe-q1",
      topic: "tidyverse",
      correct: "c",
      options: &[
        ("a", "%>% multiplies two values"),
        ("b", "%>% assigns a value to a variable"),
        ("c", "%>% passes the left-hand result into the next function"),
      ],
    },
    ChoiceQuestion {
      id: "vector-q1",
      topic: "data-types",
      correct: "a",
      options: &[
        ("a", "c() combines values into a vector"),
        ("b", "v() combines values into a vector"),
        ("c", "vector() is the only way to build a vector"),
      ],
    },
  ]
}

/// Multi-question quizzes with per-question corrective hints.
pub fn quiz_bank() -> Vec<Quiz> {
  vec![Quiz {
    id: "ggplot-quiz",
    topic: "visualization",
    questions: vec![
      QuizQuestion {
        id: "ggplot-q1",
        expected: "b",
        hint: "`ggplot()` is the initialization function.",
      },
      QuizQuestion {
        id: "ggplot-q2",
        expected: "b",
        hint: "`aes()` maps variables to visual properties.",
      },
    ],
    success: "All correct! `ggplot()` initializes the plot, and `aes()` maps data variables to visual aesthetics.",
    fail_lead_in: "Incorrect. ",
    review_suffix: "Please review the Grammar of Graphics section.",
  }]
}

/// Tab groups present on the lesson pages: sibling panes keyed by group so
/// independent groups never interfere.
pub fn tab_groups() -> Vec<(&'static str, Vec<String>)> {
  vec![
    (
      "r-basics-tabs",
      vec!["r-basics-lesson".into(), "r-basics-exercises".into(), "r-basics-solutions".into()],
    ),
    (
      "visualization-tabs",
      vec!["visualization-lesson".into(), "visualization-exercises".into()],
    ),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bank_builds_and_ids_are_unique() {
    let bank = exercise_bank().expect("bank should compile");
    assert!(bank.len() >= 25, "bank unexpectedly small: {}", bank.len());

    let mut seen = std::collections::HashSet::new();
    for ex in &bank {
      assert!(seen.insert(ex.id), "duplicate exercise id: {}", ex.id);
      assert!(!ex.checker.success.is_empty());
      match &ex.checker.pass {
        PassRule::All(reqs) => assert!(!reqs.is_empty(), "{} has no requirements", ex.id),
        PassRule::Any(alts) => assert!(!alts.is_empty(), "{} has no alternatives", ex.id),
      }
    }
  }

  #[test]
  fn itemized_checkers_have_a_clause_per_requirement() {
    for ex in exercise_bank().expect("bank") {
      if let (Feedback::Itemized { .. }, PassRule::All(reqs)) =
        (&ex.checker.feedback, &ex.checker.pass)
      {
        for (i, r) in reqs.iter().enumerate() {
          assert!(r.clause.is_some(), "{} requirement {} lacks a clause", ex.id, i);
        }
      }
    }
  }

  #[test]
  fn choice_questions_know_their_correct_label() {
    for q in choice_bank() {
      assert!(
        q.options.iter().any(|(v, _)| *v == q.correct),
        "{} correct value not among options",
        q.id
      );
      assert_ne!(q.correct_label(), q.correct);
    }
  }
}
