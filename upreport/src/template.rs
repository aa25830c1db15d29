//! The fixed markdown layout of a unit process report.

use crate::report::ReportFields;

pub const DEFAULT_POC: &str = "NETL";

pub const DEFAULT_VERSION: &str = "1.0.0";

/// Standard US Government sponsorship disclaimer
pub const DISCLAIMER: &str = "This report was prepared as an account of work \
sponsored by an agency of the United States Government. \
Neither the United States Government nor any agency thereof, \
nor any of their employees, makes any warranty, express or \
implied, or assumes any legal liability or responsibility for \
the accuracy, completeness, or usefulness of any information, \
apparatus, product, or process disclosed, or represents that \
its use would not infringe privately owned rights. Reference \
herein to any specific commercial product, process, or service \
by trade name, trademark, manufacturer, or otherwise does not \
necessarily constitute or imply its endorsement, recommendation, \
or favoring by the United States Government or any agency \
thereof. The views and opinions of authors expressed herein do \
not necessarily state or reflect those of the United States \
Government or any agency thereof.";

const RELEVANT_FLOWS: &str = "## Relevant Flows Included:

Releases to Air
:   - [ ] Greenhouse Gases
    - [ ] Criteria Air Pollutants
    - [ ] Other

Releases to Water
:   - [ ] Inorganic Emissions
    - [ ] Organic Emissions
    - [ ] Other

Releases to Soil
:   - [ ] Inorganic Emissions
    - [ ] Organic Emissions
    - [ ] Other

Water Usage
:   - [ ] Water Demand
    - [ ] Water Consumption
";

fn or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(fallback)
}

/// Fill the report template. Every slot has a fallback, so this never fails.
pub fn render(fields: &ReportFields, disclaimer: &str) -> String {
    let sources = if fields.sources.is_empty() {
        "None".to_string()
    } else {
        fields.sources.join("\n\n")
    };

    format!(
        "# Overview

## Process Name
{name}

## Reference Flow
{flow}

## Brief Description
{description}

# Metadata
{process_doc}

{relevant}

# Process Description

## Goal & Scope
{goal}

## Boundary & Description
{boundary}

## Methods

### Block Flow Diagram
Link to your block flow diagram.
For example:

```sh
![](data/diagram.png)
```

### Input Flows
{inputs}

## Output Flows
{outputs}

### Process Parameters
{parameters}

### Allocation
{allocation}

### Calculations
{calculations}

## References
{sources}

# Document Control Information
Date Created
:   {date}

Point of Contact
:   {poc}

Revision History
:   {version}

How to Cite This Document
:   TBA

# Disclaimer/Terms of Use
{disclaimer}
",
        name = or(&fields.reference_name, "N/A"),
        flow = or(&fields.reference_flow, "N/A"),
        description = or(&fields.reference_description, "N/A"),
        process_doc = or(&fields.process_doc, "No process documentation available."),
        relevant = RELEVANT_FLOWS,
        goal = or(&fields.goal_scope, "No goal or scope info available."),
        boundary = or(
            &fields.boundary,
            "Detailed boundary description not available"
        ),
        inputs = or(&fields.input_flows, "No input flows available."),
        outputs = or(&fields.output_flows, "No output flows available."),
        parameters = or(&fields.parameters, "None"),
        allocation = or(&fields.allocation, "No allocation"),
        calculations = or(&fields.calculations, "No calculations available."),
        sources = sources,
        date = or(&fields.create_date, "TBA"),
        poc = or(&fields.point_of_contact, DEFAULT_POC),
        version = or(&fields.version, DEFAULT_VERSION),
        disclaimer = disclaimer,
    )
}

/// The report skeleton with no data, hints left as HTML comments.
pub fn empty(disclaimer: &str) -> String {
    format!(
        "# Overview

## Process Name

## Reference Flow

## Brief Description

# Metadata

{relevant}

# Process Description

## Goal & Scope
<!-- Documentation - Administrative information - Project -->

## Boundary & Description
<!-- Documentation - Data source information - Data selection -->

## Methods

### Block Flow Diagram

### Input Flows

### Output Flows

### Process Parameters
<!-- Add specific adjustable process parameters here if any -->

### Allocation

### Calculations

## References

# Document Control Information
Date Created
:   TBA

Point of Contact
:   TBA

Revision History
:   TBA

How to Cite This Document
:   TBA

# Disclaimer/Terms of Use
{disclaimer}
",
        relevant = RELEVANT_FLOWS,
        disclaimer = disclaimer
    )
}
