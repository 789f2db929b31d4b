//! Decoding parameters of parsed unit definitions

use ajs_parser::ajs::decoding::{
    CycleUnit, DayCounting, DaySpec, DelayTime, DelayTiming, Designation, Element,
    ExecutionCycle, IntegerDecoder, MapSize, Relation, RelationKind, RelativeBase, RuleNumber,
    StartDate, StartTime, TextDecoder, TimeOfDay, UnitTypeDecoder,
};
use ajs_parser::{decoder_for, parse, DecodeError, DecodeResult, Parameter, Unit, UnitTree};

const SCHEDULED_NET: &str = "\
unit=MONTHLY,,jp1admin,;
{
    ty=n;
    sz=5x3;
    sd=1,2025/12/b-2;
    sd=2,*15;
    st=1,+25:30;
    cy=1,(2,m);
    cy=(3,w);
    ey=1,C120;
    fd=90;
    el=EXTRACT,j,+80 +48;
    el=LOAD,rj,+240 +48;
    ar=(f=EXTRACT,t=LOAD,seq);
    unit=EXTRACT,,,;
    {
        ty=j;
        cm=\"pull #\"orders#\"\";
    }
    unit=LOAD,,,;
    {
        ty=rj;
    }
}
";

fn scheduled_net() -> UnitTree {
    parse(SCHEDULED_NET).expect("scheduled jobnet parses")
}

fn param<'a>(unit: &'a Unit, name: &'a str, index: usize) -> &'a Parameter {
    unit.parameters_named(name)
        .nth(index)
        .unwrap_or_else(|| panic!("missing {} #{}", name, index))
}

#[test]
fn test_element_at_the_origin_is_cell_zero() {
    let tree = parse("unit=FOO,,,;{ty=n;el=XXXX0001,g,+80 +48;}").unwrap();
    let el = tree.root().unwrap().parameter("el").unwrap();
    let element = el.decode(decoder_for::<Element>()).unwrap();
    assert_eq!(element.unit_name, "XXXX0001");
    assert_eq!(element.type_code, "g");
    assert_eq!((element.h, element.v), (80, 48));
    assert_eq!(element.grid(), (0, 0));
}

#[test]
fn test_undefined_start_date_needs_rule_zero() {
    let tree = parse("unit=A,,,;{ty=n;sd=0, ud;sd=1,ud;}").unwrap();
    let unit = tree.root().unwrap();

    let undefined = param(unit, "sd", 0).decode(decoder_for::<StartDate>()).unwrap();
    assert_eq!(undefined.rule, RuleNumber::UNDEFINED);
    assert_eq!(undefined.designation, Designation::Undefined);

    let err = param(unit, "sd", 1).decode(decoder_for::<StartDate>()).unwrap_err();
    assert_eq!(err.parameter(), "sd");
    assert_eq!(err.raw(), "1,ud");
    assert_eq!(
        err.to_string(),
        "cannot decode `sd` value `1,ud`: `ud` needs rule number 0, found 1"
    );
}

#[test]
fn test_cycle_with_rule_number() {
    let tree = scheduled_net();
    let net = tree.root().unwrap();

    let cycle = param(net, "cy", 0).decode(decoder_for::<ExecutionCycle>()).unwrap();
    assert_eq!(cycle.rule.get(), 1);
    assert_eq!(cycle.interval, 2);
    assert_eq!(cycle.unit, CycleUnit::Month);

    let default_rule = param(net, "cy", 1).decode(decoder_for::<ExecutionCycle>()).unwrap();
    assert_eq!(default_rule.rule, RuleNumber::DEFAULT);
    assert_eq!((default_rule.interval, default_rule.unit), (3, CycleUnit::Week));
}

#[test]
fn test_schedule_of_a_jobnet() {
    let tree = scheduled_net();
    let net = tree.root().unwrap();

    let month_end = param(net, "sd", 0).decode(decoder_for::<StartDate>()).unwrap();
    match month_end.designation {
        Designation::Scheduled(date) => {
            assert_eq!((date.year, date.month), (Some(2025), Some(12)));
            assert_eq!(
                date.day,
                DaySpec::MonthEnd {
                    counting: DayCounting::Calendar,
                    days_before: 2
                }
            );
        }
        other => panic!("expected a scheduled date, got {other:?}"),
    }

    let business_day = param(net, "sd", 1).decode(decoder_for::<StartDate>()).unwrap();
    assert_eq!(business_day.rule.get(), 2);
    assert!(matches!(
        business_day.designation,
        Designation::Scheduled(date) if date.day == DaySpec::Day { counting: DayCounting::BusinessDay, day: 15 }
    ));

    let start = param(net, "st", 0).decode(decoder_for::<StartTime>()).unwrap();
    assert!(start.relative);
    assert_eq!(start.time, TimeOfDay { hour: 25, minute: 30 });
    assert_eq!(start.time.minutes(), 1530);

    let end = param(net, "ey", 0).decode(decoder_for::<DelayTime>()).unwrap();
    assert_eq!(
        end.timing,
        DelayTiming::Relative {
            base: RelativeBase::OwnJobnetStart,
            minutes: 120
        }
    );

    assert_eq!(param(net, "fd", 0).decode(IntegerDecoder::EXPECTED_DURATION).unwrap(), 90);
}

#[test]
fn test_map_layout_resolves_to_children() {
    let tree = scheduled_net();
    let net = tree.root().unwrap();

    let size = param(net, "sz", 0).decode(decoder_for::<MapSize>()).unwrap();
    assert_eq!(size, MapSize { columns: 5, rows: 3 });

    let elements: Vec<Element> = net
        .parameters_named("el")
        .map(|el| el.decode(decoder_for::<Element>()))
        .collect::<DecodeResult<_>>()
        .unwrap();
    let cells: Vec<(u32, u32)> = elements.iter().map(Element::grid).collect();
    assert_eq!(cells, vec![(0, 0), (1, 0)]);
    for element in &elements {
        let child = tree.resolve_element(net.id(), element).unwrap();
        assert_eq!(child.name(), element.unit_name);
        assert_eq!(child.type_code(), element.type_code);
    }

    let relation = param(net, "ar", 0).decode(decoder_for::<Relation>()).unwrap();
    assert_eq!(relation.kind, RelationKind::Sequential);
    let (from, to) = tree.resolve_relation(net.id(), &relation).unwrap();
    assert_eq!(from.fully_qualified_name(), "MONTHLY/EXTRACT");
    assert_eq!(to.fully_qualified_name(), "MONTHLY/LOAD");
}

#[test]
fn test_job_level_decoders() {
    let tree = scheduled_net();
    let extract = tree.find("MONTHLY/EXTRACT").unwrap();
    let comment = param(extract, "cm", 0).decode(TextDecoder).unwrap();
    assert_eq!(comment, "pull \"orders\"");

    let load = tree.find("MONTHLY/LOAD").unwrap();
    let unit_type = param(load, "ty", 0).decode(UnitTypeDecoder).unwrap();
    assert!(unit_type.is_recovery());
    assert!(unit_type.is_job());
}

#[test]
fn test_decode_failures_leave_the_tree_usable() {
    let tree = parse("unit=A,,,;{ty=n;cy=(13,m);st=48:00;pr=9;}").unwrap();
    let unit = tree.root().unwrap();

    let cycle = param(unit, "cy", 0).decode(decoder_for::<ExecutionCycle>()).unwrap_err();
    assert_eq!(cycle.reason(), "interval 13 is out of range 1-12");
    assert!(param(unit, "st", 0).decode(decoder_for::<StartTime>()).is_err());
    assert!(param(unit, "pr", 0).decode(IntegerDecoder::PRIORITY).is_err());

    assert_eq!(unit.parameters().len(), 4);
    assert_eq!(param(unit, "ty", 0).decode(TextDecoder).unwrap(), "n");
}

#[test]
fn test_closures_are_decoders() {
    let tree = parse("unit=A,,,;{ty=n;te=/bin/run,-x,--fast;}").unwrap();
    let te = tree.root().unwrap().parameter("te").unwrap();
    let arguments = |param: &Parameter| -> DecodeResult<Vec<String>> {
        match param.values() {
            [command, rest @ ..] if !command.as_str().is_empty() => {
                Ok(rest.iter().map(|value| value.as_str().into_owned()).collect())
            }
            _ => Err(DecodeError::new(param, "no command")),
        }
    };
    assert_eq!(te.decode(arguments).unwrap(), vec!["-x", "--fast"]);
}
